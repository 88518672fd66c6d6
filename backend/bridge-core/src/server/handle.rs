//! Handle to the running bridge server.

use crate::BRIDGE_BASE_URL;
use crate::error::server::ServerError;

use std::net::SocketAddr;

use log::info;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Returned by [`start_bridge_server`](crate::server::start_bridge_server).
///
/// Dropping the handle leaves the server running until the runtime stops; call
/// [`shutdown`](Self::shutdown) for a graceful stop that lets in-flight
/// requests finish.
#[derive(Debug)]
pub struct BridgeServerHandle {
    pub(crate) local_addr: SocketAddr,
    pub(crate) shutdown: oneshot::Sender<()>,
    pub(crate) task: JoinHandle<Result<(), ServerError>>,
}

impl BridgeServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// URL the host window loads, e.g. `http://127.0.0.1:49152/`.
    pub fn base_url(&self) -> String {
        format!("{BRIDGE_BASE_URL}:{}/", self.port())
    }

    pub async fn shutdown(self) -> Result<(), ServerError> {
        info!("Stopping bridge server on {}", self.local_addr);
        // The receiver is gone only if the server task already ended.
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| ServerError::serve(format!("server task failed: {e}")))?
    }
}
