//! Core types, errors, and shared functionality.

mod errors;
mod language;
mod layout;
mod types;

pub use errors::*;
pub use language::*;
pub use layout::*;
pub use types::*;
