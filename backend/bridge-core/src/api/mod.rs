//! Host functions exposed to the frontend.
//!
//! | Name               | Kind   | Gated (default)  |
//! |--------------------|--------|------------------|
//! | `readFile`         | binary | no               |
//! | `writeFile`        | binary | no               |
//! | `compressImage`    | binary | yes (empty bytes)|
//! | `calculateMetrics` | binary | yes (nil)        |
//! | `checkCodec`       | direct | no               |
//! | `checkMetric`      | direct | no               |

pub mod files;
pub mod image;

use crate::codec::Toolbox;
use crate::error::rpc::{HandlerFailure, RpcError};
use crate::rpc::{DirectRegistry, RpcRegistry};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_bytes::ByteBuf;

pub const READ_FILE: &str = "readFile";
pub const WRITE_FILE: &str = "writeFile";
pub const COMPRESS_IMAGE: &str = "compressImage";
pub const CALCULATE_METRICS: &str = "calculateMetrics";
pub const CHECK_CODEC: &str = "checkCodec";
pub const CHECK_METRIC: &str = "checkMetric";

/// Register the binary host functions.
///
/// # Errors
///
/// Returns [`RpcError::Encode`] if a gate default cannot be encoded.
pub fn register_api(registry: &mut RpcRegistry, toolbox: Arc<Toolbox>) -> Result<(), RpcError> {
    registry.register(READ_FILE, files::read_file);
    registry.register(WRITE_FILE, files::write_file);

    let encode_tools = Arc::clone(&toolbox);
    registry.register_gated(COMPRESS_IMAGE, ByteBuf::new(), move |args| {
        image::compress_image(&encode_tools, args)
    })?;

    let metric_tools = toolbox;
    registry.register_gated(
        CALCULATE_METRICS,
        None::<BTreeMap<String, Option<f64>>>,
        move |args| image::calculate_metrics(&metric_tools, args).map(Some),
    )?;

    Ok(())
}

/// Register the JSON capability probes.
pub fn register_direct(registry: &mut DirectRegistry, toolbox: Arc<Toolbox>) {
    let codec_tools = Arc::clone(&toolbox);
    registry.register(CHECK_CODEC, move |_| to_json(codec_tools.check_codecs()));

    let metric_tools = toolbox;
    registry.register(CHECK_METRIC, move |_| to_json(metric_tools.check_metrics()));
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, HandlerFailure> {
    serde_json::to_value(value).map_err(|e| HandlerFailure::new("EncodeError", e.to_string()))
}
