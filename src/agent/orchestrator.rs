//! Orchestrator for one question-answering run.
//!
//! Pipeline: validate → supervisor routes → at most one responder runs →
//! its output becomes the [`Reply`]. Nothing persists between runs.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::message::Conversation;
use super::registry::AgentRegistry;
use super::reply::Reply;
use super::router::{RouterOutcome, SupervisorAgent};
use crate::error::AgentError;

/// Maximum byte length of a question.
pub const MAX_QUESTION_LEN: usize = 10_000;

/// Routes questions and runs the chosen responder.
pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    supervisor: SupervisorAgent,
}

impl Orchestrator {
    /// Creates an orchestrator over a registry.
    #[must_use]
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        let supervisor = registry.supervisor();
        Self {
            registry,
            supervisor,
        }
    }

    /// Answers a single question.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Orchestration`] for empty or oversized input,
    /// [`AgentError::RoutingUndecided`] when no route can be chosen, and
    /// any error from the direct responder.
    pub async fn invoke(&self, question: &str) -> Result<Reply, AgentError> {
        if question.trim().is_empty() {
            return Err(AgentError::Orchestration {
                message: "Question cannot be empty".to_string(),
            });
        }

        if question.len() > MAX_QUESTION_LEN {
            return Err(AgentError::Orchestration {
                message: format!(
                    "Question exceeds maximum length ({} bytes, max {MAX_QUESTION_LEN})",
                    question.len()
                ),
            });
        }

        let start = Instant::now();
        let conversation = Conversation::from_question(question);

        let reply = match self.supervisor.route(&conversation).await? {
            RouterOutcome::Answer(text) => {
                debug!("supervisor answered directly");
                Reply::answer(text)
            }
            RouterOutcome::Delegate(route) => {
                let responder = self.registry.responder(route);
                debug!(route = %route, "delegating");
                Reply::from(responder.process(&conversation).await?)
            }
        };

        info!(
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "question answered"
        );
        Ok(reply)
    }

    /// Underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
