use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::errors::IntoCore;
use crate::store::{TabularStoreTrait, WriteHandle};
use fundbook_core::datasets::csv_codec::{decode_movements, encode_movements};
use fundbook_core::datasets::Dataset;
use fundbook_core::errors::Error;
use fundbook_core::movements::{CapitalMovement, MovementRepositoryTrait, MovementUpdate};
use fundbook_core::Result;

pub struct MovementRepository {
    store: Arc<dyn TabularStoreTrait>,
    writer: WriteHandle,
}

impl MovementRepository {
    pub fn new(store: Arc<dyn TabularStoreTrait>, writer: WriteHandle) -> Self {
        MovementRepository { store, writer }
    }
}

fn load_all(store: &dyn TabularStoreTrait) -> Result<Vec<CapitalMovement>> {
    let content = store.load(Dataset::Movements)?;
    Ok(decode_movements(&content)
        .into_core(Dataset::Movements)?
        .rows)
}

fn save_all(store: &dyn TabularStoreTrait, rows: &[CapitalMovement]) -> Result<()> {
    store.save(Dataset::Movements, &encode_movements(rows)?)
}

/// Position in the whole dataset of the `index`-th row of `fund`.
fn locate(rows: &[CapitalMovement], fund: &str, index: usize) -> Result<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, m)| m.fund == fund)
        .nth(index)
        .map(|(pos, _)| pos)
        .ok_or_else(|| Error::NotFound(format!("Movement #{} of fund '{}'", index, fund)))
}

#[async_trait]
impl MovementRepositoryTrait for MovementRepository {
    fn list(&self, fund: Option<&str>) -> Result<Vec<CapitalMovement>> {
        let mut rows = load_all(self.store.as_ref())?;
        if let Some(fund) = fund {
            rows.retain(|m| m.fund == fund);
        }
        Ok(rows)
    }

    async fn create(&self, movement: CapitalMovement) -> Result<CapitalMovement> {
        self.writer
            .exec(move |store| -> Result<CapitalMovement> {
                let mut rows = load_all(store)?;
                rows.push(movement.clone());
                save_all(store, &rows)?;
                Ok(movement)
            })
            .await
    }

    async fn update(
        &self,
        fund: &str,
        index: usize,
        update: MovementUpdate,
    ) -> Result<CapitalMovement> {
        let fund = fund.to_string();
        self.writer
            .exec(move |store| -> Result<CapitalMovement> {
                let mut rows = load_all(store)?;
                let pos = locate(&rows, &fund, index)?;
                update.apply_to(&mut rows[pos]);
                save_all(store, &rows)?;
                Ok(rows.swap_remove(pos))
            })
            .await
    }

    async fn delete(&self, fund: &str, index: usize) -> Result<CapitalMovement> {
        let fund = fund.to_string();
        self.writer
            .exec(move |store| -> Result<CapitalMovement> {
                let mut rows = load_all(store)?;
                let pos = locate(&rows, &fund, index)?;
                let removed = rows.remove(pos);
                save_all(store, &rows)?;
                Ok(removed)
            })
            .await
    }

    async fn replace_all(&self, movements: Vec<CapitalMovement>) -> Result<usize> {
        self.writer
            .exec(move |store| -> Result<usize> {
                save_all(store, &movements)?;
                info!("Stored {} movements", movements.len());
                Ok(movements.len())
            })
            .await
    }
}
