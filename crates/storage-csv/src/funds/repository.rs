use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::errors::IntoCore;
use crate::store::{TabularStoreTrait, WriteHandle};
use fundbook_core::datasets::csv_codec::{decode_funds, encode_funds};
use fundbook_core::datasets::Dataset;
use fundbook_core::errors::Error;
use fundbook_core::funds::FundRepositoryTrait;
use fundbook_core::Result;

pub struct FundRepository {
    store: Arc<dyn TabularStoreTrait>,
    writer: WriteHandle,
}

impl FundRepository {
    pub fn new(store: Arc<dyn TabularStoreTrait>, writer: WriteHandle) -> Self {
        FundRepository { store, writer }
    }
}

fn load_all(store: &dyn TabularStoreTrait) -> Result<Vec<String>> {
    let content = store.load(Dataset::Funds)?;
    Ok(decode_funds(&content).into_core(Dataset::Funds)?.rows)
}

#[async_trait]
impl FundRepositoryTrait for FundRepository {
    fn list_registered(&self) -> Result<Vec<String>> {
        load_all(self.store.as_ref())
    }

    async fn register(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.writer
            .exec(move |store| -> Result<()> {
                let mut names = load_all(store)?;
                if names.contains(&name) {
                    return Err(Error::ConstraintViolation(format!(
                        "Fund '{}' already exists",
                        name
                    )));
                }
                names.push(name);
                store.save(Dataset::Funds, &encode_funds(&names)?)
            })
            .await
    }

    async fn replace_all(&self, names: Vec<String>) -> Result<usize> {
        self.writer
            .exec(move |store| -> Result<usize> {
                store.save(Dataset::Funds, &encode_funds(&names)?)?;
                info!("Stored {} fund names", names.len());
                Ok(names.len())
            })
            .await
    }
}
