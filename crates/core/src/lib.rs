// crates/core/src/lib.rs
pub mod batch;
pub mod classify;
pub mod error;
pub mod flatten;
pub mod llm;
pub mod table;
pub mod taxonomy;

pub use classify::*;
pub use error::*;
pub use flatten::*;
pub use table::*;
pub use taxonomy::*;
