use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::funds_model::{Fund, NewFund};
use super::funds_traits::{FundRepositoryTrait, FundServiceTrait};
use crate::errors::{Error, Result};
use crate::identity::RequestContext;
use crate::movements::MovementRepositoryTrait;
use crate::trades::TradeRepositoryTrait;

/// Service for the fund registry
pub struct FundService {
    repository: Arc<dyn FundRepositoryTrait>,
    movement_repository: Arc<dyn MovementRepositoryTrait>,
    trade_repository: Arc<dyn TradeRepositoryTrait>,
}

impl FundService {
    pub fn new(
        repository: Arc<dyn FundRepositoryTrait>,
        movement_repository: Arc<dyn MovementRepositoryTrait>,
        trade_repository: Arc<dyn TradeRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            movement_repository,
            trade_repository,
        }
    }

    /// Registered names plus every name referenced by a row.
    fn all_names(&self) -> Result<BTreeSet<String>> {
        let mut names: BTreeSet<String> = self.repository.list_registered()?.into_iter().collect();
        names.extend(
            self.movement_repository
                .list(None)?
                .into_iter()
                .map(|m| m.fund),
        );
        names.extend(self.trade_repository.list(None)?.into_iter().map(|t| t.fund));
        Ok(names)
    }
}

#[async_trait::async_trait]
impl FundServiceTrait for FundService {
    fn list_funds(&self, ctx: &RequestContext) -> Result<Vec<Fund>> {
        if !ctx.is_admin() {
            return Ok(vec![Fund {
                name: ctx.assigned_fund.clone(),
            }]);
        }
        Ok(self
            .all_names()?
            .into_iter()
            .map(|name| Fund { name })
            .collect())
    }

    async fn create_fund(&self, ctx: &RequestContext, new_fund: NewFund) -> Result<Fund> {
        ctx.require_admin("create funds")?;
        new_fund.validate()?;
        let name = new_fund.normalized_name();
        debug!("Creating fund '{}' requested by {}", name, ctx.username);

        if self.all_names()?.contains(&name) {
            warn!("Fund '{}' already exists, creation ignored", name);
            return Err(Error::ConstraintViolation(format!(
                "Fund '{}' already exists",
                name
            )));
        }

        self.repository.register(&name).await?;
        Ok(Fund { name })
    }

    fn fund_exists(&self, name: &str) -> Result<bool> {
        Ok(self.all_names()?.contains(name))
    }

    fn ensure_fund_exists(&self, name: &str) -> Result<()> {
        if self.fund_exists(name)? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("Fund '{}'", name)))
        }
    }
}
