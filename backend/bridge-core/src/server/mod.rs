//! Loopback HTTP server for the frontend.
//!
//! One axum router serves three surfaces:
//!
//! - `GET|HEAD <any path>` - static assets through [`AssetServer`]
//! - `POST /api/<name>` - binary RPC calls through [`RpcRegistry`]
//! - `POST /direct/<name>` - JSON accessors through [`DirectRegistry`]
//!
//! Asset and RPC work is blocking (file and archive reads, external tools), so
//! every request runs on tokio's blocking pool.
//!
//! # Security
//!
//! - Binds to `127.0.0.1` only
//! - Every surface (assets, `/api`, `/direct`) requires the client token as
//!   the `User-Agent`

pub mod access;
pub mod assets;
mod handle;
pub mod mime;
pub mod range;

pub use access::AccessPolicy;
pub use assets::AssetServer;
pub use handle::BridgeServerHandle;

use crate::config::ServerSettings;
use crate::error::asset::AssetError;
use crate::error::rpc::RpcError;
use crate::error::server::ServerError;
use crate::resource::MountRegistry;
use crate::rpc::{DirectRegistry, RpcRegistry};
use crate::{BRIDGE_HOSTNAME, DIRECT_ROUTE_PREFIX, RPC_CONTENT_TYPE, RPC_ROUTE_PREFIX};

use common::{ClientToken, ErrorLocation};

use std::panic::Location;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use const_format::concatcp;
use log::{debug, error, info, warn};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::spawn_blocking;

const RPC_ROUTE: &str = concatcp!(RPC_ROUTE_PREFIX, "{function}");
const DIRECT_ROUTE: &str = concatcp!(DIRECT_ROUTE_PREFIX, "{function}");

/// Everything a request handler needs, shared across connections.
#[derive(Clone)]
pub struct BridgeState {
    access: AccessPolicy,
    assets: Arc<AssetServer>,
    rpc: Arc<RpcRegistry>,
    direct: Arc<DirectRegistry>,
}

impl BridgeState {
    pub fn new(
        mounts: Arc<MountRegistry>,
        token: ClientToken,
        rpc: RpcRegistry,
        direct: DirectRegistry,
    ) -> Self {
        let access = AccessPolicy::new(token);
        Self {
            assets: Arc::new(AssetServer::new(mounts, access.clone())),
            access,
            rpc: Arc::new(rpc),
            direct: Arc::new(direct),
        }
    }

    pub fn assets(&self) -> &AssetServer {
        &self.assets
    }

    /// Refuse host calls from anything but the paired window.
    fn require_paired(&self, headers: &HeaderMap, function: &str) -> Result<(), RpcError> {
        let agent = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok());
        if self.access.permits(agent) {
            return Ok(());
        }
        warn!("Refused call to '{function}' from unpaired client");
        Err(RpcError::forbidden("client token mismatch"))
    }
}

pub fn router(state: BridgeState) -> Router {
    Router::new()
        .route(RPC_ROUTE, post(call_binary).fallback(serve_asset))
        .route(DIRECT_ROUTE, post(call_direct).fallback(serve_asset))
        .fallback(serve_asset)
        // Image payloads are raw RGBA and routinely exceed axum's default cap.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Starts the bridge server on `127.0.0.1:<port>`.
///
/// # Arguments
///
/// * `settings` - Server settings; port 0 binds an ephemeral port
/// * `state` - Mounts, client token and RPC registries
///
/// # Returns
///
/// Returns [`BridgeServerHandle`] on success, carrying the bound address.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the port is in use or cannot be bound.
pub async fn start_bridge_server(
    settings: &ServerSettings,
    state: BridgeState,
) -> Result<BridgeServerHandle, ServerError> {
    let address = format!("{BRIDGE_HOSTNAME}:{}", settings.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            location: ErrorLocation::from(Location::caller()),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
        address,
        location: ErrorLocation::from(Location::caller()),
        source,
    })?;

    info!("Bridge server listening on {}", local_addr);

    let (shutdown, shutdown_signal) = oneshot::channel::<()>();
    let app = router(state);
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_signal.await;
            })
            .await
            .map_err(|e| {
                error!("Bridge server stopped with error: {e}");
                ServerError::serve(e.to_string())
            })
    });

    Ok(BridgeServerHandle {
        local_addr,
        shutdown,
        task,
    })
}

async fn serve_asset(
    State(state): State<BridgeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let assets = Arc::clone(&state.assets);
    let path = uri.path().to_string();

    let outcome = spawn_blocking(move || {
        let result = assets.respond(&method, &path, &headers);
        if let Err(e) = &result {
            debug!("{method} {path} rejected: {e}");
        }
        result
    })
    .await;

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => e.into_response(),
        Err(e) => AssetError::internal(format!("asset task failed: {e}")).into_response(),
    }
}

async fn call_binary(
    State(state): State<BridgeState>,
    Path(function): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = state.require_paired(&headers, &function) {
        return e.into_response();
    }

    let rpc = Arc::clone(&state.rpc);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let outcome =
        spawn_blocking(move || rpc.dispatch(&function, content_type.as_deref(), &body)).await;

    match outcome {
        Ok(Ok(envelope)) => ([(header::CONTENT_TYPE, RPC_CONTENT_TYPE)], envelope).into_response(),
        Ok(Err(e)) => {
            warn!("RPC call rejected: {e}");
            e.into_response()
        }
        Err(e) => RpcError::encode(format!("rpc task failed: {e}")).into_response(),
    }
}

async fn call_direct(
    State(state): State<BridgeState>,
    Path(function): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = state.require_paired(&headers, &function) {
        return e.into_response();
    }

    if !state.direct.contains(&function) {
        return RpcError::unknown_function(function).into_response();
    }

    let args = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(args) => args,
            Err(e) => {
                warn!("Direct call '{function}' has malformed arguments: {e}");
                return RpcError::bad_request(e.to_string()).into_response();
            }
        }
    };

    let direct = Arc::clone(&state.direct);
    let outcome = spawn_blocking(move || direct.call(&function, args)).await;

    match outcome {
        Ok(Ok(value)) => Json(value).into_response(),
        Ok(Err(failure)) => {
            error!("Direct call failed: {failure}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "kind": failure.kind, "message": failure.message })),
            )
                .into_response()
        }
        Err(e) => RpcError::encode(format!("direct task failed: {e}")).into_response(),
    }
}
