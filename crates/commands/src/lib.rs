//! `commands` crate: the fixed command vocabulary, the backend's raw cluster
//! payload, and the `CommandDispatcher` trait.
//!
//! Everything that talks to the demo backend implements [`CommandDispatcher`]:
//! the HTTP transport and the in-memory mock alike. The engine crate
//! issues commands through this trait object and never sees transport details.

pub mod command;
pub mod error;
pub mod payload;
pub mod traits;
pub mod mock;

pub use command::Command;
pub use error::DispatchError;
pub use payload::{ClusterPayload, RawCmd, RawNode, RawProcess, RawRun};
pub use traits::CommandDispatcher;
