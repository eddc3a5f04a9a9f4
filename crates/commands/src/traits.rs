//! The `CommandDispatcher` trait: the contract every backend transport must
//! fulfil.

use async_trait::async_trait;

use crate::{ClusterPayload, Command, DispatchError};

/// Performs named commands against the demo backend.
///
/// Every call answers with the backend's full cluster payload after the
/// operation; callers replace their snapshot with it wholesale.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Perform `command` and return the cluster as it looks afterwards.
    async fn dispatch(&self, command: &Command) -> Result<ClusterPayload, DispatchError>;

    /// Fetch the current cluster without changing it.
    async fn refresh(&self) -> Result<ClusterPayload, DispatchError>;
}
