pub mod errors;
pub mod manifest;
pub mod span;

pub use errors::Diagnostic;
pub use manifest::{LoxManifest, ManifestError, OutputFormat};
pub use span::{Position, Span};
