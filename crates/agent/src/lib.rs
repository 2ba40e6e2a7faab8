//! Question answering over a case study.
//!
//! The agent is a deterministic keyword router, not a language model:
//! 1. **Routing** (`router`) - lowercase the question and pick the first rule whose
//!    keywords match, in a fixed priority order
//! 2. **Answering** (`answers`) - fill the topic's template from `CaseAnalysis`
//! 3. **Recording** (`runtime`, `conversation`) - append the question and the answer to
//!    the caller's conversation
//!
//! # Key Types
//!
//! - `QuestionRouter` - ordered rule table and dispatch
//! - `Conversation` - append-only log owned by whoever runs the session
//! - `AdvisorRuntime` - one call per user turn

pub mod answers;
pub mod conversation;
pub mod router;
pub mod runtime;

pub use conversation::{Conversation, ConversationEntry, Role};
pub use router::{QuestionRouter, Rule, Trigger, RULES};
pub use runtime::AdvisorRuntime;
