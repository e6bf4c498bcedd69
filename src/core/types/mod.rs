//! Request, response and context types shared by providers and the router
//!
//! These are deliberately small: wire-format translation belongs to the
//! provider adapters, the router only needs to move these values around.

pub mod context;
pub mod model;
pub mod requests;
pub mod responses;

pub use context::RequestContext;
pub use model::ProviderCapability;
pub use requests::{
    ChatMessage, ChatRequest, MessageRole, Tool, assistant_message, system_message, user_message,
};
pub use responses::{ChatChunk, ChatResponse, FinishReason, Usage};
