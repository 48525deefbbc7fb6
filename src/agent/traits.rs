//! Agent and responder traits.
//!
//! [`Agent`] describes how an agent talks to the model (prompt, schema,
//! tools). [`Responder`] is the uniform interface the orchestrator uses to
//! hand a conversation to whichever agent the router picked.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::executor::ToolExecutor;
use super::message::{ChatRequest, Conversation, ResponseSchema, TokenUsage};
use super::provider::LlmProvider;
use super::reply::AgentOutput;
use super::route::Route;
use super::tool::ToolDefinition;
use crate::error::AgentError;

/// Response from an agent execution.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The agent's text output.
    pub content: String,
    /// Token usage for the final call.
    pub usage: TokenUsage,
    /// Why the model stopped generating (e.g. `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
}

/// Model-facing configuration of an agent.
///
/// Agents that support tool-calling override [`Agent::tools`] and run
/// through [`execute_with_tools`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging and identification.
    fn name(&self) -> &'static str;

    /// Model identifier to use for this agent.
    fn model(&self) -> &str;

    /// System prompt that defines the agent's role and behavior.
    fn system_prompt(&self) -> &str;

    /// Whether to request JSON-formatted output.
    fn json_mode(&self) -> bool {
        false
    }

    /// Schema the final answer must follow, if any.
    fn response_schema(&self) -> Option<ResponseSchema> {
        None
    }

    /// Sampling temperature (0.0 = deterministic, higher = more creative).
    fn temperature(&self) -> f32 {
        0.0
    }

    /// Maximum tokens for the response.
    fn max_tokens(&self) -> u32 {
        2048
    }

    /// Tool definitions available to this agent.
    fn tools(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }

    /// Maximum tool-calling loop iterations before aborting.
    fn max_tool_iterations(&self) -> usize {
        10
    }

    /// Builds a request: system prompt, then the conversation turns.
    fn build_request(&self, conversation: &Conversation) -> ChatRequest {
        ChatRequest {
            model: self.model().to_string(),
            messages: conversation.to_messages(self.system_prompt(), None),
            temperature: Some(self.temperature()),
            max_tokens: Some(self.max_tokens()),
            json_mode: self.json_mode(),
            response_schema: self.response_schema(),
            tools: self.tools(),
        }
    }

    /// Executes the agent against the conversation (no tools).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures.
    async fn execute(
        &self,
        provider: &dyn LlmProvider,
        conversation: &Conversation,
    ) -> Result<AgentResponse, AgentError> {
        let mut request = self.build_request(conversation);
        request.tools.clear();

        let response = provider.chat(&request).await?;

        Ok(AgentResponse {
            content: response.content,
            usage: response.usage,
            finish_reason: response.finish_reason,
        })
    }
}

/// Executes an agent with tool-calling support.
///
/// If the agent's [`Agent::tools`] is empty, falls through to
/// [`Agent::execute`].
///
/// # Errors
///
/// Returns [`AgentError`] on API failures or if the tool loop exceeds the
/// agent's max iterations. Tool failures are fed back to the model, not
/// returned.
pub async fn execute_with_tools(
    agent: &dyn Agent,
    provider: &dyn LlmProvider,
    conversation: &Conversation,
    executor: &ToolExecutor,
) -> Result<AgentResponse, AgentError> {
    let mut request = agent.build_request(conversation);

    if request.tools.is_empty() {
        return agent.execute(provider, conversation).await;
    }

    let response = super::agentic_loop::agentic_loop(
        provider,
        &mut request,
        executor,
        agent.max_tool_iterations(),
    )
    .await?;

    Ok(AgentResponse {
        content: response.content,
        usage: response.usage,
        finish_reason: response.finish_reason,
    })
}

/// A downstream handler selected by the router.
#[async_trait]
pub trait Responder: Send + Sync {
    /// The route this responder serves.
    fn route(&self) -> Route;

    /// Handles a conversation.
    ///
    /// # Errors
    ///
    /// Only the direct responder propagates errors; the others fold every
    /// failure into their documented fallback output.
    async fn process(&self, conversation: &Conversation) -> Result<AgentOutput, AgentError>;
}

/// Parses model output as JSON, tolerating a surrounding code fence.
pub(crate) fn parse_json_response<T: DeserializeOwned>(content: &str) -> Result<T, AgentError> {
    let trimmed = content.trim();
    let json_str = if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    };

    serde_json::from_str(json_str).map_err(|e| AgentError::ResponseParse {
        message: e.to_string(),
        content: content.to_string(),
    })
}
