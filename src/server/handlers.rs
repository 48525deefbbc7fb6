//! Route handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::params::{BattleParams, ChatBody, ErrorBody, Welcome};
use super::state::AppState;
use crate::agent::{BattleVerdict, Reply, analyze_battle};
use crate::error::Error;

/// Any failure surfaced to an HTTP client as 500 `{detail}`.
#[derive(Debug)]
pub struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/battle", get(battle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /`
pub async fn root() -> Json<Welcome> {
    Json(Welcome::default())
}

/// `POST /chat`
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Reply>, ApiError> {
    info!(question_len = body.question.len(), "chat request");
    match state.orchestrator.invoke(&body.question).await {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => {
            error!(error = %e, "chat request failed");
            Err(e.into())
        }
    }
}

/// `GET /battle`
pub async fn battle(
    State(state): State<AppState>,
    Query(params): Query<BattleParams>,
) -> Json<BattleVerdict> {
    info!(
        pokemon1 = %params.pokemon1,
        pokemon2 = %params.pokemon2,
        "battle request"
    );
    let verdict = analyze_battle(
        &state.client,
        &state.battle_expert,
        &params.pokemon1,
        &params.pokemon2,
    )
    .await;
    Json(verdict)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::reply::{BATTLE_IMPOSSIBLE, BATTLE_IMPOSSIBLE_REASONING};
    use crate::agent::{AgentConfig, LlmProvider, PromptSet};
    use crate::testing::{ScriptedProvider, pokedex_client};
    use serde_json::{Value, json};

    fn state(provider: &Arc<ScriptedProvider>) -> AppState {
        let config = AgentConfig::builder()
            .api_key("test")
            .model("test-model")
            .build()
            .unwrap_or_else(|_| unreachable!());
        AppState::from_parts(
            Arc::clone(provider) as Arc<dyn LlmProvider>,
            pokedex_client(),
            config,
            PromptSet::defaults(),
        )
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        serde_json::from_slice(&bytes).unwrap_or_else(|e| unreachable!("{e}"))
    }

    #[tokio::test]
    async fn test_root_welcome() {
        let Json(welcome) = root().await;
        assert_eq!(
            welcome.message,
            "Welcome to the Pokémon Multi-Agent System API"
        );
    }

    #[tokio::test]
    async fn test_chat_direct_response() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .text("direct_response")
                .text("Hello, trainer!"),
        );
        let result = chat(
            State(state(&provider)),
            Json(ChatBody {
                question: "Hi there".to_string(),
            }),
        )
        .await;

        let Ok(Json(reply)) = result else {
            unreachable!("chat should succeed")
        };
        assert_eq!(
            serde_json::to_value(reply).unwrap_or_default(),
            json!({"answer": "Hello, trainer!"})
        );
    }

    #[tokio::test]
    async fn test_chat_routing_failure_is_500() {
        let provider = Arc::new(ScriptedProvider::new().error("down").error("down"));
        let result = chat(
            State(state(&provider)),
            Json(ChatBody {
                question: "anything".to_string(),
            }),
        )
        .await;

        let Err(err) = result else {
            unreachable!("routing should fail")
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_battle_with_unknown_pokemon() {
        let provider = Arc::new(ScriptedProvider::new());
        let Json(verdict) = battle(
            State(state(&provider)),
            Query(BattleParams {
                pokemon1: "pikachu".to_string(),
                pokemon2: "abc123".to_string(),
            }),
        )
        .await;

        assert_eq!(
            serde_json::to_value(&verdict).unwrap_or_default(),
            json!({"reasoning": BATTLE_IMPOSSIBLE_REASONING, "winner": BATTLE_IMPOSSIBLE})
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_battle_uses_simplified_expert() {
        let provider = Arc::new(
            ScriptedProvider::new().json(&json!({"reasoning": "Grass resists.", "winner": "bulbasaur"})),
        );
        let Json(verdict) = battle(
            State(state(&provider)),
            Query(BattleParams {
                pokemon1: "Pikachu".to_string(),
                pokemon2: "Bulbasaur".to_string(),
            }),
        )
        .await;
        assert_eq!(verdict.outcome(), "bulbasaur");
        assert!(provider.requests()[0].tools.is_empty());
    }
}
