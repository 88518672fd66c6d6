use crate::error::rpc::HandlerFailure;

use std::fs::{self, File};
use std::io::Read;

use serde::Deserialize;
use serde_bytes::ByteBuf;

#[derive(Debug, Deserialize)]
pub struct ReadFileArgs {
    pub file: String,
    /// Read at most this many bytes; absent or negative reads everything.
    #[serde(default)]
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WriteFileArgs {
    pub file: String,
    pub data: ByteBuf,
}

pub fn read_file(args: ReadFileArgs) -> Result<ByteBuf, HandlerFailure> {
    let mut file = File::open(&args.file)?;
    let mut bytes = Vec::new();
    match args.size.and_then(|size| u64::try_from(size).ok()) {
        Some(limit) => file.by_ref().take(limit).read_to_end(&mut bytes)?,
        None => file.read_to_end(&mut bytes)?,
    };
    Ok(ByteBuf::from(bytes))
}

pub fn write_file(args: WriteFileArgs) -> Result<(), HandlerFailure> {
    fs::write(&args.file, args.data.as_ref())?;
    Ok(())
}
