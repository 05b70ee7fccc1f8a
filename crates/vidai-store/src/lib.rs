//! Persistence boundary for the VideoAI backend.
//!
//! The document store (MongoDB in production) stays behind the [`UserStore`]
//! and [`ProjectStore`] traits; this crate defines the query contract and
//! ships [`MemoryStore`], an in-process implementation used by tests and
//! local development.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{ProjectStore, UserStore};
