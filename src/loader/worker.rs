//! Background worker for off-thread loading.
//!
//! Fetch and decode run on the worker; the decoded batch is sent back so the
//! thread that owns the sink can deliver it.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::orchestrator::{LoadOutcome, Loader};
use super::sink::SceneSink;
use super::source::ByteSource;
use crate::scene::DecodedScene;
use crate::util::LoadError;

/// Commands sent from the sink owner to the worker.
#[derive(Debug)]
pub enum LoadCommand {
    /// Fetch `src` and decode it as `model_id`.
    Load { model_id: String, src: String },
    /// Stop the worker thread.
    Stop,
}

/// Results sent from the worker back to the sink owner.
#[derive(Debug)]
pub enum LoadResult {
    /// Decoded and ready for delivery.
    Ready(DecodedScene),
    /// Fetch or decode failed; nothing was delivered.
    Failed(LoadError),
}

impl LoadResult {
    /// Model this result belongs to.
    pub fn model_id(&self) -> &str {
        match self {
            Self::Ready(scene) => &scene.model_id,
            Self::Failed(err) => &err.model_id,
        }
    }

    /// Deliver a ready scene to the sink, or signal the failure.
    pub fn deliver<S: SceneSink + ?Sized>(
        self,
        loader: &Loader,
        sink: &mut S,
    ) -> Result<LoadOutcome, LoadError> {
        match self {
            Self::Ready(scene) => Ok(loader.deliver(scene, sink)),
            Self::Failed(err) => Err(loader.fail(err, sink)),
        }
    }
}

/// Handle to communicate with the background worker.
pub struct LoadWorker {
    tx: Sender<LoadCommand>,
    rx: Receiver<LoadResult>,
    handle: Option<JoinHandle<()>>,
}

impl LoadWorker {
    /// Spawn a worker thread sharing `loader` and `source`.
    pub fn spawn(loader: Arc<Loader>, source: Arc<dyn ByteSource>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = channel::<LoadCommand>();
        let (res_tx, res_rx) = channel::<LoadResult>();

        let handle = thread::Builder::new()
            .name("batchmesh-loader".into())
            .spawn(move || worker_loop(&loader, source.as_ref(), cmd_rx, res_tx))?;

        Ok(Self {
            tx: cmd_tx,
            rx: res_rx,
            handle: Some(handle),
        })
    }

    /// Queue a load under an id from [`Loader::resolve_model_id`].
    /// Returns false if the worker is gone.
    pub fn request(&self, model_id: impl Into<String>, src: impl Into<String>) -> bool {
        self.tx
            .send(LoadCommand::Load { model_id: model_id.into(), src: src.into() })
            .is_ok()
    }

    /// Check for a finished load (non-blocking).
    pub fn try_recv(&self) -> Option<LoadResult> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished load. `None` once the worker has exited.
    pub fn recv(&self) -> Option<LoadResult> {
        self.rx.recv().ok()
    }

    /// Stop the worker and wait for it to finish.
    pub fn stop(&mut self) {
        let _ = self.tx.send(LoadCommand::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for LoadWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Main worker loop - runs in background thread.
fn worker_loop(
    loader: &Loader,
    source: &dyn ByteSource,
    rx: Receiver<LoadCommand>,
    tx: Sender<LoadResult>,
) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            LoadCommand::Load { model_id, src } => {
                let result = match loader.fetch_and_decode(&model_id, &src, source) {
                    Ok(scene) => LoadResult::Ready(scene),
                    Err(e) => LoadResult::Failed(LoadError::new(model_id, e)),
                };
                if tx.send(result).is_err() {
                    break; // Owner disconnected
                }
            }
            LoadCommand::Stop => break,
        }
    }
    tracing::trace!("load worker exited");
}
