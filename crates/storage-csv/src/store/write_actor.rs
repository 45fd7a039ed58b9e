use log::error;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::TabularStoreTrait;
use crate::errors::StorageError;
use fundbook_core::errors::{Error, Result};

// A job receives the store and returns a type-erased result.
type Job<T> = Box<dyn FnOnce(&dyn TabularStoreTrait) -> Result<T> + Send + 'static>;

type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
///
/// Every read-modify-write cycle runs on the actor, one at a time, so two
/// requests in the same process never interleave their load and save.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, Reply)>,
}

impl WriteHandle {
    /// Runs `job` on the writer actor and waits for its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&dyn TabularStoreTrait) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |store| job(store).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| StorageError::WriterUnavailable("writer task has stopped".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            StorageError::WriterUnavailable("writer dropped the reply".to_string())
        })??;

        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::Unexpected("Writer returned an unexpected result type".to_string()))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Spawns a background Tokio task that owns all writes to `store` and
/// processes them serially. Must be called inside a Tokio runtime.
pub fn spawn_writer(store: Arc<dyn TabularStoreTrait>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, Reply)>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            // A panicking job fails its own request; the actor keeps serving.
            let result = catch_unwind(AssertUnwindSafe(|| job(store.as_ref())))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    error!("Write job panicked: {}", message);
                    Err(Error::Unexpected(format!("write job panicked: {}", message)))
                });
            // The requester may have gone away.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
