use crate::RPC_CONTENT_TYPE;
use crate::error::rpc::{HandlerFailure, RpcError};
use crate::rpc::envelope::{encode_failure, encode_success};
use crate::rpc::handler::{GatedHandler, TypedHandler, encode_value};
use crate::rpc::RpcHandler;

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use log::{debug, error, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Default)]
pub struct RpcRegistry {
    handlers: HashMap<String, Arc<dyn RpcHandler>>,
}

impl RpcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A, R, F>(&mut self, name: impl Into<String>, func: F)
    where
        A: DeserializeOwned + 'static,
        R: Serialize + 'static,
        F: Fn(A) -> Result<R, HandlerFailure> + Send + Sync + 'static,
    {
        self.register_handler(name, TypedHandler::new(func));
    }

    /// Register `func` behind a latest-call-wins gate.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Encode`] if `default` cannot be encoded.
    pub fn register_gated<A, R, F>(
        &mut self,
        name: impl Into<String>,
        default: R,
        func: F,
    ) -> Result<(), RpcError>
    where
        A: DeserializeOwned + 'static,
        R: Serialize + 'static,
        F: Fn(A) -> Result<R, HandlerFailure> + Send + Sync + 'static,
    {
        let name = name.into();
        let encoded_default = encode_value(&default).map_err(|e| RpcError::encode(e.message))?;
        let handler = GatedHandler::new(name.clone(), encoded_default, TypedHandler::new(func));
        self.register_handler(name, handler);
        Ok(())
    }

    pub fn register_handler(&mut self, name: impl Into<String>, handler: impl RpcHandler + 'static) {
        let name = name.into();
        info!("Registered RPC function '{name}'");
        self.handlers.insert(name, Arc::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run one binary call and produce the response envelope.
    ///
    /// The function name is checked before the content type. Handler failures,
    /// panics included, are folded into the failure envelope and never surface
    /// as an `Err`.
    ///
    /// # Errors
    ///
    /// - [`RpcError::UnknownFunction`] when `name` is not registered
    /// - [`RpcError::BadRequest`] when `content_type` is not `application/msgpack`
    /// - [`RpcError::Encode`] if the envelope itself cannot be written
    pub fn dispatch(
        &self,
        name: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Vec<u8>, RpcError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| RpcError::unknown_function(name))?;

        if content_type != Some(RPC_CONTENT_TYPE) {
            return Err(RpcError::bad_request(format!(
                "'{name}' expects {RPC_CONTENT_TYPE}, got {}",
                content_type.unwrap_or("no content type")
            )));
        }

        debug!("Dispatching '{name}' ({} byte arguments)", body.len());

        let outcome = catch_unwind(AssertUnwindSafe(|| handler.call(body)))
            .unwrap_or_else(|payload| Err(HandlerFailure::new("Panic", panic_message(payload.as_ref()))));

        match outcome {
            Ok(value) => encode_success(&value),
            Err(failure) => {
                error!("RPC function '{name}' failed: {failure}");
                encode_failure(&failure)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
