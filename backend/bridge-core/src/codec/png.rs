use crate::error::codec::CodecError;

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

/// Raw RGBA pixels as the frontend's `ImageData` carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: ByteBuf,
}

impl ImageData {
    pub fn expected_len(&self) -> Option<usize> {
        usize::try_from(self.width)
            .ok()?
            .checked_mul(usize::try_from(self.height).ok()?)?
            .checked_mul(4)
    }

    pub fn write_png(&self, path: &Path) -> Result<(), CodecError> {
        let expected = self.expected_len().ok_or_else(|| {
            CodecError::image(format!("{}x{} image is too large", self.width, self.height))
        })?;
        if self.data.len() != expected {
            return Err(CodecError::image(format!(
                "{}x{} RGBA image needs {expected} bytes, got {}",
                self.width,
                self.height,
                self.data.len()
            )));
        }

        let pixels = RgbaImage::from_raw(self.width, self.height, self.data.to_vec())
            .ok_or_else(|| CodecError::image("pixel buffer does not match dimensions"))?;
        pixels
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| CodecError::image(format!("writing {}: {e}", path.display())))
    }
}
