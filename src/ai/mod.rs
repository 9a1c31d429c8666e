//! Language-model integration for diary comments.
//!
//! # Module Structure
//!
//! - `provider`: the provider trait, response type and provider selection
//! - `stub`: deterministic offline provider
//! - `remote`: HTTP client for chat-completions endpoints
//! - `prompts`: versioned templates and prompt assembly
//!
//! # Example
//!
//! ```
//! use solace::ai::{LanguageModelProvider, StubProvider};
//!
//! let response = StubProvider.generate("any prompt", 180)?;
//! assert_eq!(response.model_name, "local-stub");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod prompts;
pub mod provider;
pub mod remote;
pub mod stub;

// Re-export commonly used types
pub use prompts::{assemble, PromptTemplate};
pub use provider::{build_provider, LanguageModelProvider, ProviderKind, ProviderResponse};
pub use remote::{RemoteProvider, RemoteProviderConfig};
pub use stub::StubProvider;
