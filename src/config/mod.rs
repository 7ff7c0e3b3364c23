//! Database configuration: types, loading, validation and the shared holder.

pub mod holder;
pub mod loader;
pub mod types;
pub mod validator;

pub use holder::*;
pub use loader::*;
pub use types::*;
pub use validator::*;
