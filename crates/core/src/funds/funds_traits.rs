//! Fund repository and service traits.

use async_trait::async_trait;

use super::funds_model::{Fund, NewFund};
use crate::errors::Result;
use crate::identity::RequestContext;

/// Persistence contract for explicitly registered fund names.
#[async_trait]
pub trait FundRepositoryTrait: Send + Sync {
    /// Registered names in registration order.
    fn list_registered(&self) -> Result<Vec<String>>;

    /// Registers a name. Fails with a constraint violation if it is already registered.
    async fn register(&self, name: &str) -> Result<()>;

    /// Replaces the whole registry. Returns the number of names stored.
    async fn replace_all(&self, names: Vec<String>) -> Result<usize>;
}

/// Business operations on funds.
#[async_trait]
pub trait FundServiceTrait: Send + Sync {
    /// Funds visible to the caller, sorted by name.
    ///
    /// Administrators see every fund (registered or referenced by any row);
    /// read-only users see only their assigned fund.
    fn list_funds(&self, ctx: &RequestContext) -> Result<Vec<Fund>>;

    /// Registers a new fund. Duplicate names (exact, case-sensitive) are rejected
    /// and leave the fund list unchanged.
    async fn create_fund(&self, ctx: &RequestContext, new_fund: NewFund) -> Result<Fund>;

    /// Whether the name is registered or referenced by any movement or trade.
    fn fund_exists(&self, name: &str) -> Result<bool>;

    /// Fails with `NotFound` if the fund does not exist.
    fn ensure_fund_exists(&self, name: &str) -> Result<()>;
}
