pub mod actions;
pub mod fallback;
#[cfg(feature = "gemini")]
pub mod gemini_provider;
pub mod image;
pub mod llm_factory;
pub mod llm_provider;
#[cfg(feature = "openai-compatible")]
pub mod openai_compatible_provider;
pub mod parsing;
pub mod pipeline;
pub mod prompts;

pub use actions::*;
pub use fallback::*;
pub use image::*;
pub use llm_factory::*;
pub use llm_provider::*;
pub use pipeline::*;
