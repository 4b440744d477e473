pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use gemini::Gemini;
pub use traits::{
    Agent, GroundedPromptBuilder, GroundedResponse, GroundingChunk, Message, MessageRole,
    PromptBuilder, WebSource,
};
pub use util::truncate_to_char_boundary;
