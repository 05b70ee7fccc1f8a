//! Request handlers.

pub mod health;
pub mod plans;
pub mod subscription;
pub mod videos;

pub use health::*;
pub use plans::*;
pub use subscription::*;
pub use videos::*;
