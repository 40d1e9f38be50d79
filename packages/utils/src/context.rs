use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::runtime::Runtime;
use tracing::instrument;

/// Shared process context: the runtime the server is driven on, plus a kill switch
/// that lets `main` (or a test) shut the server down gracefully.
#[derive(Clone)]
pub struct AppContext {
    pub rt: Arc<Runtime>,
    killed: Arc<AtomicBool>,
    kill_sender: tokio::sync::broadcast::Sender<()>,
    // keeps the channel open, a send with no receivers would fail
    _kill_receiver: Arc<tokio::sync::broadcast::Receiver<()>>,
}

impl AppContext {
    /// Builds a fresh multi-threaded runtime
    pub fn new() -> std::io::Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let (kill_sender, kill_receiver) = tokio::sync::broadcast::channel(1);

        Ok(Self {
            rt: Arc::new(rt),
            kill_sender,
            _kill_receiver: Arc::new(kill_receiver),
            killed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Every running task that should stop on shutdown holds one of these
    #[instrument(skip(self), fields(subsys = "AppContext"))]
    pub fn get_kill_receiver(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.kill_sender.subscribe()
    }

    /// Typically only called from main or tests
    #[instrument(skip(self), fields(subsys = "AppContext"))]
    pub fn kill(&self) {
        if self.killed.swap(true, Ordering::SeqCst) {
            tracing::debug!("kill requested more than once");
            return;
        }
        if self.kill_sender.send(()).is_err() {
            tracing::warn!("kill signal had no receivers");
        }
    }

    pub fn killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }
}
