//! Multi-agent question answering.
//!
//! A supervisor classifies each question and hands it to one of three
//! responders backed by an OpenAI-compatible provider and the shared
//! `PokéAPI` client.
//!
//! # Architecture
//!
//! ```text
//! question → Orchestrator
//!   └── SupervisorAgent (raw reply, then JSON reply)
//!       ├── researcher      → PokemonData
//!       ├── pokemon_expert  → BattleVerdict
//!       └── direct_response → {answer}
//! ```

pub mod agentic_loop;
pub mod battle;
pub mod client;
pub mod config;
pub mod direct;
pub mod executor;
pub mod expert;
pub mod message;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod reply;
pub mod researcher;
pub mod route;
pub mod router;
pub mod tool;
pub mod traits;

// Re-export key types
pub use battle::analyze_battle;
pub use client::create_provider;
pub use config::AgentConfig;
pub use direct::DirectResponseAgent;
pub use executor::ToolExecutor;
pub use expert::{ExpertOptions, ExpertTools, PokemonExpertAgent};
pub use message::{ChatMessage, ChatRequest, ChatResponse, Conversation, Role, TokenUsage};
pub use orchestrator::Orchestrator;
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use registry::AgentRegistry;
pub use reply::{AgentOutput, BaseStats, BattleVerdict, PokemonData, Reply, ResponseFormat};
pub use researcher::ResearcherAgent;
pub use route::Route;
pub use router::{RouterOutcome, SupervisorAgent};
pub use tool::{ToolCall, ToolDefinition, ToolResult, ToolSet};
pub use traits::{Agent, Responder, execute_with_tools};
