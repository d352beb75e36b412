//! Driver Welfare Advisor
//!
//! Routes a driver's free-text question to a welfare topic and renders the
//! prompt an assistant model should answer. Sending the prompt is left to
//! the embedding application.

mod prompt;
mod topics;

pub use prompt::{build_prompt, Prompt, PromptBuilder};
pub use topics::AdviceTopic;
