use crate::codec::{EncoderState, ImageData, Toolbox};
use crate::error::codec::CodecError;
use crate::error::rpc::HandlerFailure;

use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;

use log::info;
use serde::Deserialize;
use serde_bytes::ByteBuf;

#[derive(Debug, Deserialize)]
pub struct CompressImageArgs {
    pub image: ImageData,
    pub encoder_state: EncoderState,
}

#[derive(Debug, Deserialize)]
pub struct CalculateMetricsArgs {
    pub original: ImageData,
    pub distorted: ImageData,
}

/// Encode an RGBA image with the selected encoder.
///
/// The input PNG and the encoder output live in a private scratch directory
/// that is removed on every return path.
pub fn compress_image(toolbox: &Toolbox, args: CompressImageArgs) -> Result<ByteBuf, HandlerFailure> {
    let workspace = toolbox.workspace()?;
    let input = workspace.path().join("input.png");
    let output = workspace.path().join("output");

    let started = Instant::now();
    args.image.write_png(&input)?;
    let invocation = args
        .encoder_state
        .invocation(toolbox.bin_dir(), &input, &output)?;
    info!("{invocation}");
    invocation.run()?;
    info!("Encode time: {:?}", started.elapsed());

    let encoded = fs::read(&output).map_err(|e| CodecError::io("reading encoder output", e))?;
    Ok(ByteBuf::from(encoded))
}

/// Score `distorted` against `original` with every available metric.
pub fn calculate_metrics(
    toolbox: &Toolbox,
    args: CalculateMetricsArgs,
) -> Result<BTreeMap<String, Option<f64>>, HandlerFailure> {
    let workspace = toolbox.workspace()?;
    let original = workspace.path().join("original.png");
    let distorted = workspace.path().join("distorted.png");

    let started = Instant::now();
    args.original.write_png(&original)?;
    args.distorted.write_png(&distorted)?;
    let scores = toolbox.compute_metrics(&original, &distorted)?;
    info!("Metrics time: {:?}", started.elapsed());

    Ok(scores)
}
