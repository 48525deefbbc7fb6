//! Supervisor routing.
//!
//! Classification is attempted twice: first as a single-word reply, then
//! as a schema-constrained JSON object. Each attempt's failure is logged
//! and swallowed. A `direct_response` decision is answered immediately by
//! the supervisor's own direct responder.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::config::AgentConfig;
use super::direct::DirectResponseAgent;
use super::message::{ChatRequest, Conversation, ResponseSchema};
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use super::route::Route;
use super::traits::parse_json_response;
use crate::error::AgentError;

/// Routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterOutcome {
    /// Hand the conversation to this responder.
    Delegate(Route),
    /// The supervisor already answered.
    Answer(String),
}

#[derive(Debug, Clone, Copy)]
enum Approach {
    Raw,
    Structured,
}

impl Approach {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Structured => "structured",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouterReply {
    next: String,
}

/// JSON schema for the structured approach: `{"next": <route>}`.
fn router_schema() -> ResponseSchema {
    let options: Vec<&str> = Route::ALL.iter().map(|r| r.as_str()).collect();
    ResponseSchema {
        name: "router".to_string(),
        description: Some("Worker to route to next.".to_string()),
        schema: json!({
            "type": "object",
            "properties": {
                "next": {"type": "string", "enum": options}
            },
            "required": ["next"],
            "additionalProperties": false
        }),
        strict: true,
    }
}

/// Supervisor that classifies a conversation into a [`Route`].
pub struct SupervisorAgent {
    provider: Arc<dyn LlmProvider>,
    model: String,
    raw_prompt: String,
    structured_prompt: String,
    max_tokens: u32,
    direct: DirectResponseAgent,
}

impl SupervisorAgent {
    /// Creates a supervisor from a prompt set.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig, prompts: &PromptSet) -> Self {
        let direct =
            DirectResponseAgent::new(Arc::clone(&provider), config, prompts.direct_answer.clone());
        Self {
            provider,
            model: config.model.clone(),
            raw_prompt: prompts.supervisor_raw(),
            structured_prompt: prompts.supervisor_structured(),
            max_tokens: config.max_tokens,
            direct,
        }
    }

    /// Routes the conversation.
    ///
    /// A `direct_response` decision is answered immediately. If that answer
    /// fails, the failure counts against the approach that chose it, so a
    /// raw decision falls through to the structured approach (up to four
    /// model calls in total).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::RoutingUndecided`] if neither approach yields
    /// a valid route.
    pub async fn route(&self, conversation: &Conversation) -> Result<RouterOutcome, AgentError> {
        for approach in [Approach::Raw, Approach::Structured] {
            match self.try_approach(approach, conversation).await {
                Ok(Some(outcome)) => {
                    info!(approach = approach.as_str(), outcome = ?outcome, "routed");
                    return Ok(outcome);
                }
                Ok(None) => {
                    debug!(approach = approach.as_str(), "no valid route in reply");
                }
                Err(e) => {
                    warn!(approach = approach.as_str(), error = %e, "routing approach failed");
                }
            }
        }
        Err(AgentError::RoutingUndecided)
    }

    async fn try_approach(
        &self,
        approach: Approach,
        conversation: &Conversation,
    ) -> Result<Option<RouterOutcome>, AgentError> {
        let route = match approach {
            Approach::Raw => self.classify_raw(conversation).await?,
            Approach::Structured => self.classify_structured(conversation).await?,
        };
        match route {
            Some(Route::DirectResponse) => {
                let answer = self.answer_directly(conversation).await?;
                Ok(Some(RouterOutcome::Answer(answer)))
            }
            Some(route) => Ok(Some(RouterOutcome::Delegate(route))),
            None => Ok(None),
        }
    }

    fn request(&self, system: &str, conversation: &Conversation) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: conversation.to_messages(system, None),
            temperature: Some(0.0),
            max_tokens: Some(self.max_tokens),
            json_mode: false,
            response_schema: None,
            tools: Vec::new(),
        }
    }

    async fn classify_raw(&self, conversation: &Conversation) -> Result<Option<Route>, AgentError> {
        let request = self.request(&self.raw_prompt, conversation);
        let response = self.provider.chat(&request).await?;
        debug!(reply = %response.content.trim(), "raw routing reply");
        Ok(Route::parse_reply(&response.content))
    }

    async fn classify_structured(
        &self,
        conversation: &Conversation,
    ) -> Result<Option<Route>, AgentError> {
        let mut request = self.request(&self.structured_prompt, conversation);
        request.response_schema = Some(router_schema());
        let response = self.provider.chat(&request).await?;
        let reply: RouterReply = parse_json_response(&response.content)?;
        Ok(Route::parse_reply(&reply.next))
    }

    async fn answer_directly(&self, conversation: &Conversation) -> Result<String, AgentError> {
        let question = conversation
            .last_user_text()
            .ok_or_else(|| AgentError::Orchestration {
                message: "conversation has no user turn".to_string(),
            })?;
        self.direct
            .respond(&Conversation::from_question(question))
            .await
    }
}

impl std::fmt::Debug for SupervisorAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupervisorAgent")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::prompt::{DIRECT_ANSWER_PROMPT, RAW_CALL_SUFFIX};
    use crate::testing::ScriptedProvider;
    use test_case::test_case;

    #[derive(Clone, Copy)]
    enum Step {
        Reply(&'static str),
        Fail,
    }

    fn scripted(steps: &[Step]) -> Arc<ScriptedProvider> {
        let provider = steps.iter().fold(ScriptedProvider::new(), |p, step| match step {
            Step::Reply(text) => p.text(text),
            Step::Fail => p.error("unavailable"),
        });
        Arc::new(provider)
    }

    fn supervisor(provider: &Arc<ScriptedProvider>) -> SupervisorAgent {
        let config = AgentConfig::builder()
            .api_key("test")
            .model("test-model")
            .build()
            .unwrap_or_else(|_| unreachable!());
        SupervisorAgent::new(
            Arc::clone(provider) as Arc<dyn LlmProvider>,
            &config,
            &PromptSet::defaults(),
        )
    }

    fn delegate(route: Route) -> Option<RouterOutcome> {
        Some(RouterOutcome::Delegate(route))
    }

    fn answer(text: &str) -> Option<RouterOutcome> {
        Some(RouterOutcome::Answer(text.to_string()))
    }

    #[test_case(&[Step::Reply("researcher")], delegate(Route::Researcher), 1 ; "raw valid")]
    #[test_case(&[Step::Reply(" Pokemon_Expert \n")], delegate(Route::PokemonExpert), 1 ; "raw normalized")]
    #[test_case(&[Step::Reply("direct_response"), Step::Reply("Hello!")], answer("Hello!"), 2 ; "raw direct answers")]
    #[test_case(&[Step::Reply("I think researcher"), Step::Reply(r#"{"next":"pokemon_expert"}"#)], delegate(Route::PokemonExpert), 2 ; "raw invalid structured valid")]
    #[test_case(&[Step::Fail, Step::Reply(r#"{"next":"researcher"}"#)], delegate(Route::Researcher), 2 ; "raw error structured valid")]
    #[test_case(&[Step::Reply("maybe"), Step::Reply(r#"{"next":"nonsense"}"#)], None, 2 ; "both invalid")]
    #[test_case(&[Step::Fail, Step::Fail], None, 2 ; "both fail")]
    #[test_case(&[Step::Reply("maybe"), Step::Reply("not json")], None, 2 ; "structured unparseable")]
    #[test_case(&[Step::Reply("direct_response"), Step::Fail, Step::Reply(r#"{"next":"direct_response"}"#), Step::Reply("Hi")], answer("Hi"), 4 ; "direct answer retried")]
    #[test_case(&[Step::Reply("direct_response"), Step::Fail, Step::Reply(r#"{"next":"direct_response"}"#), Step::Fail], None, 4 ; "direct answer fails twice")]
    #[tokio::test]
    async fn test_route_resolution(steps: &[Step], expected: Option<RouterOutcome>, calls: usize) {
        let provider = scripted(steps);
        let result = supervisor(&provider)
            .route(&Conversation::from_question("question"))
            .await;

        match expected {
            Some(outcome) => assert_eq!(result.ok(), Some(outcome)),
            None => assert!(matches!(result, Err(AgentError::RoutingUndecided))),
        }
        assert_eq!(provider.call_count(), calls);
    }

    #[tokio::test]
    async fn test_requests_use_expected_prompts() {
        let provider = scripted(&[
            Step::Reply("unsure"),
            Step::Reply(r#"{"next":"direct_response"}"#),
            Step::Reply("Hello there."),
        ]);
        let outcome = supervisor(&provider)
            .route(&Conversation::from_question("Hi!"))
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(outcome, RouterOutcome::Answer("Hello there.".to_string()));

        let requests = provider.requests();
        assert!(requests[0].messages[0].content.ends_with(RAW_CALL_SUFFIX));
        assert!(requests[0].response_schema.is_none());

        let schema = requests[1]
            .response_schema
            .as_ref()
            .unwrap_or_else(|| unreachable!());
        assert!(schema.strict);
        assert_eq!(
            schema.schema["properties"]["next"]["enum"],
            json!(["researcher", "pokemon_expert", "direct_response"])
        );

        assert_eq!(requests[2].messages[0].content, DIRECT_ANSWER_PROMPT);
        assert_eq!(requests[2].messages[1].content, "Hi!");
    }
}
