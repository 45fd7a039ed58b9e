use log::debug;
use std::sync::Arc;

use super::movements_model::{CapitalMovement, IndexedMovement, MovementUpdate, NewMovement};
use super::movements_traits::{MovementRepositoryTrait, MovementServiceTrait};
use crate::errors::Result;
use crate::funds::FundServiceTrait;
use crate::identity::RequestContext;

/// Service for managing capital movements
pub struct MovementService {
    repository: Arc<dyn MovementRepositoryTrait>,
    fund_service: Arc<dyn FundServiceTrait>,
}

impl MovementService {
    pub fn new(
        repository: Arc<dyn MovementRepositoryTrait>,
        fund_service: Arc<dyn FundServiceTrait>,
    ) -> Self {
        Self {
            repository,
            fund_service,
        }
    }
}

#[async_trait::async_trait]
impl MovementServiceTrait for MovementService {
    fn list_movements(&self, ctx: &RequestContext, fund: &str) -> Result<Vec<IndexedMovement>> {
        ctx.authorize_read(fund)?;
        let mut rows: Vec<IndexedMovement> = self
            .repository
            .list(Some(fund))?
            .into_iter()
            .enumerate()
            .map(|(index, movement)| IndexedMovement { index, movement })
            .collect();
        // Newest first; same-day rows keep their reverse insertion order.
        rows.reverse();
        rows.sort_by(|a, b| b.movement.date.cmp(&a.movement.date));
        Ok(rows)
    }

    async fn create_movement(
        &self,
        ctx: &RequestContext,
        new_movement: NewMovement,
    ) -> Result<CapitalMovement> {
        ctx.authorize_write(&new_movement.fund)?;
        new_movement.validate()?;
        self.fund_service
            .ensure_fund_exists(new_movement.fund.trim())?;
        debug!(
            "Recording {} of {} for partner '{}' in fund '{}'",
            new_movement.kind, new_movement.amount, new_movement.partner, new_movement.fund
        );
        self.repository
            .create(CapitalMovement::from(new_movement))
            .await
    }

    async fn update_movement(
        &self,
        ctx: &RequestContext,
        fund: &str,
        index: usize,
        update: MovementUpdate,
    ) -> Result<CapitalMovement> {
        ctx.authorize_write(fund)?;
        update.validate()?;
        self.repository.update(fund, index, update).await
    }

    async fn delete_movement(
        &self,
        ctx: &RequestContext,
        fund: &str,
        index: usize,
    ) -> Result<CapitalMovement> {
        ctx.authorize_write(fund)?;
        debug!("Deleting movement #{} of fund '{}'", index, fund);
        self.repository.delete(fund, index).await
    }
}
