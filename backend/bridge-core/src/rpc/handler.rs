use crate::error::rpc::HandlerFailure;
use crate::gate::CallGate;
use crate::rpc::RpcHandler;

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Adapts a typed closure to [`RpcHandler`].
///
/// The argument array decodes positionally into `A`, so `A` is usually a
/// struct whose fields mirror the parameter list; optional trailing
/// parameters carry `#[serde(default)]`.
pub struct TypedHandler<A, R, F> {
    func: F,
    _signature: PhantomData<fn(A) -> R>,
}

impl<A, R, F> TypedHandler<A, R, F>
where
    A: DeserializeOwned,
    R: Serialize,
    F: Fn(A) -> Result<R, HandlerFailure> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _signature: PhantomData,
        }
    }
}

impl<A, R, F> RpcHandler for TypedHandler<A, R, F>
where
    A: DeserializeOwned,
    R: Serialize,
    F: Fn(A) -> Result<R, HandlerFailure> + Send + Sync,
{
    fn call(&self, args: &[u8]) -> Result<Vec<u8>, HandlerFailure> {
        let args: A = rmp_serde::from_slice(args)?;
        let value = (self.func)(args)?;
        encode_value(&value)
    }
}

pub(crate) fn encode_value<R: Serialize>(value: &R) -> Result<Vec<u8>, HandlerFailure> {
    rmp_serde::to_vec_named(value).map_err(|e| HandlerFailure::new("EncodeError", e.to_string()))
}

/// Runs an inner handler behind a [`CallGate`]; superseded calls answer with
/// the pre-encoded default.
pub struct GatedHandler<H> {
    gate: CallGate<Vec<u8>>,
    inner: H,
}

impl<H: RpcHandler> GatedHandler<H> {
    pub fn new(name: impl Into<String>, encoded_default: Vec<u8>, inner: H) -> Self {
        Self {
            gate: CallGate::new(name, encoded_default),
            inner,
        }
    }
}

impl<H: RpcHandler> RpcHandler for GatedHandler<H> {
    fn call(&self, args: &[u8]) -> Result<Vec<u8>, HandlerFailure> {
        self.gate.run(|| self.inner.call(args))
    }
}
