//! Test doubles shared across module tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::agent::message::{ChatRequest, ChatResponse, TokenUsage};
use crate::agent::provider::LlmProvider;
use crate::agent::tool::ToolCall;
use crate::error::AgentError;
use crate::pokeapi::{PokeApiClient, PokeApiTransport, TransportError};

/// Canned `PokéAPI` payloads keyed by path. Unknown paths answer 404.
#[derive(Debug, Default)]
pub struct StaticTransport {
    routes: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, payload: Value) -> Self {
        self.routes.insert(path.to_string(), payload);
        self
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|p| *p == path)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl PokeApiTransport for StaticTransport {
    async fn get_json(&self, resource: &str, name: &str) -> Result<Value, TransportError> {
        let path = format!("{resource}/{name}");
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.clone());
        self.routes
            .get(&path)
            .cloned()
            .ok_or(TransportError::Status(404))
    }

    fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub fn pikachu_payload() -> Value {
    json!({
        "id": 25,
        "name": "pikachu",
        "base_experience": 112,
        "height": 4,
        "weight": 60,
        "abilities": [
            {"ability": {"name": "static"}},
            {"ability": {"name": "lightning-rod"}}
        ],
        "stats": [
            {"stat": {"name": "hp"}, "base_stat": 35},
            {"stat": {"name": "attack"}, "base_stat": 55},
            {"stat": {"name": "defense"}, "base_stat": 40},
            {"stat": {"name": "special-attack"}, "base_stat": 50},
            {"stat": {"name": "special-defense"}, "base_stat": 50},
            {"stat": {"name": "speed"}, "base_stat": 90}
        ],
        "types": [{"slot": 1, "type": {"name": "electric"}}]
    })
}

pub fn bulbasaur_payload() -> Value {
    json!({
        "id": 1,
        "name": "bulbasaur",
        "stats": [
            {"stat": {"name": "hp"}, "base_stat": 45},
            {"stat": {"name": "speed"}, "base_stat": 45}
        ],
        "types": [{"type": {"name": "grass"}}, {"type": {"name": "poison"}}]
    })
}

/// Client over a transport that knows pikachu and bulbasaur.
pub fn pokedex_client() -> Arc<PokeApiClient> {
    let transport = StaticTransport::new()
        .route("pokemon/pikachu", pikachu_payload())
        .route("pokemon/bulbasaur", bulbasaur_payload())
        .route(
            "type/electric",
            json!({"id": 13, "name": "electric", "damage_relations": {
                "double_damage_to": [{"name": "water"}]
            }}),
        );
    Arc::new(PokeApiClient::with_transport(Arc::new(transport), 10))
}

/// Provider that replays queued replies in order and records each request.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ChatResponse, AgentError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, reply: Result<ChatResponse, AgentError>) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    pub fn text(self, content: &str) -> Self {
        self.push(Ok(ChatResponse {
            content: content.to_string(),
            usage: TokenUsage::default(),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }))
    }

    pub fn json(self, value: &Value) -> Self {
        self.text(&value.to_string())
    }

    pub fn tool_calls(self, calls: &[(&str, &str)]) -> Self {
        let tool_calls = calls
            .iter()
            .enumerate()
            .map(|(i, (name, arguments))| ToolCall {
                id: format!("call_{i}"),
                name: (*name).to_string(),
                arguments: (*arguments).to_string(),
            })
            .collect();
        self.push(Ok(ChatResponse {
            content: String::new(),
            usage: TokenUsage::default(),
            tool_calls,
            finish_reason: Some("tool_calls".to_string()),
        }))
    }

    pub fn error(self, message: &str) -> Self {
        self.push(Err(AgentError::ApiRequest {
            message: message.to_string(),
            status: Some(500),
        }))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(AgentError::ApiRequest {
                    message: "script exhausted".to_string(),
                    status: None,
                })
            })
    }
}
