pub mod config;
pub mod content;
pub mod error;
pub mod id;
pub mod layouts;
pub mod project;
pub mod slide;
pub mod store;
pub mod theme;

pub use config::*;
pub use content::*;
pub use error::*;
pub use id::*;
pub use project::*;
pub use slide::*;
pub use store::*;
pub use theme::*;
