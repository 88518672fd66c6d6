//! The binary response envelope.
//!
//! Success: `[true, <value>]`. Failure: `[false, [<kind>, <message>]]`.
//! The value is spliced in already encoded, so handlers choose their own
//! msgpack representation.

use crate::error::rpc::{HandlerFailure, RpcError};

use serde::de::DeserializeOwned;

pub fn encode_success(value: &[u8]) -> Result<Vec<u8>, RpcError> {
    let mut out = Vec::with_capacity(value.len() + 2);
    rmp::encode::write_array_len(&mut out, 2).map_err(|e| RpcError::encode(e.to_string()))?;
    rmp::encode::write_bool(&mut out, true).map_err(|e| RpcError::encode(e.to_string()))?;
    out.extend_from_slice(value);
    Ok(out)
}

pub fn encode_failure(failure: &HandlerFailure) -> Result<Vec<u8>, RpcError> {
    rmp_serde::to_vec(&(false, (failure.kind.as_str(), failure.message.as_str())))
        .map_err(|e| RpcError::encode(e.to_string()))
}

/// A decoded envelope, as the frontend sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(Vec<u8>),
    Failure { kind: String, message: String },
}

impl Envelope {
    pub fn decode(bytes: &[u8]) -> Result<Self, RpcError> {
        let mut rest = bytes;
        let len = rmp::decode::read_array_len(&mut rest).map_err(|e| RpcError::decode(e.to_string()))?;
        if len != 2 {
            return Err(RpcError::decode(format!("envelope has {len} elements, expected 2")));
        }

        let success = rmp::decode::read_bool(&mut rest).map_err(|e| RpcError::decode(e.to_string()))?;
        if success {
            return Ok(Envelope::Success(rest.to_vec()));
        }

        let (kind, message): (String, String) =
            rmp_serde::from_slice(rest).map_err(|e| RpcError::decode(e.to_string()))?;
        Ok(Envelope::Failure { kind, message })
    }

    /// Decodes the success value; a failure envelope becomes an error.
    pub fn value<T: DeserializeOwned>(&self) -> Result<T, RpcError> {
        match self {
            Envelope::Success(bytes) => {
                rmp_serde::from_slice(bytes).map_err(|e| RpcError::decode(e.to_string()))
            }
            Envelope::Failure { kind, message } => {
                Err(RpcError::decode(format!("call failed: {kind}: {message}")))
            }
        }
    }
}
