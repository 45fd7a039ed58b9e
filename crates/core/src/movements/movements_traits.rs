//! Movement repository and service traits.

use async_trait::async_trait;

use super::movements_model::{CapitalMovement, IndexedMovement, MovementUpdate, NewMovement};
use crate::errors::Result;
use crate::identity::RequestContext;

/// Persistence contract for capital movements.
///
/// Movements have no stored id: they are addressed by `(fund, index)`, the
/// zero-based position among the fund's rows in insertion order.
#[async_trait]
pub trait MovementRepositoryTrait: Send + Sync {
    /// Snapshot of all movements, optionally restricted to one fund, in insertion order.
    fn list(&self, fund: Option<&str>) -> Result<Vec<CapitalMovement>>;

    /// Appends a movement.
    async fn create(&self, movement: CapitalMovement) -> Result<CapitalMovement>;

    /// Replaces the non-key fields of the movement at `index` within `fund`.
    async fn update(
        &self,
        fund: &str,
        index: usize,
        update: MovementUpdate,
    ) -> Result<CapitalMovement>;

    /// Removes the movement at `index` within `fund` and returns it.
    async fn delete(&self, fund: &str, index: usize) -> Result<CapitalMovement>;

    /// Replaces the whole dataset. Returns the number of rows stored.
    async fn replace_all(&self, movements: Vec<CapitalMovement>) -> Result<usize>;
}

/// Business operations on capital movements.
#[async_trait]
pub trait MovementServiceTrait: Send + Sync {
    /// Fund movements, newest first, each tagged with its index.
    fn list_movements(&self, ctx: &RequestContext, fund: &str) -> Result<Vec<IndexedMovement>>;

    async fn create_movement(
        &self,
        ctx: &RequestContext,
        new_movement: NewMovement,
    ) -> Result<CapitalMovement>;

    async fn update_movement(
        &self,
        ctx: &RequestContext,
        fund: &str,
        index: usize,
        update: MovementUpdate,
    ) -> Result<CapitalMovement>;

    async fn delete_movement(
        &self,
        ctx: &RequestContext,
        fund: &str,
        index: usize,
    ) -> Result<CapitalMovement>;
}
