//! Image encoders and their command lines.
//!
//! Each encoder is an external executable in the tools directory. The
//! frontend sends `{type, options}`; [`EncoderState`] decodes that into the
//! matching typed options record, and [`EncoderState::invocation`] turns it
//! into an argv.

use crate::codec::invocation::Invocation;
use crate::codec::options::OptionValue;
use crate::codec::tool_path;
use crate::error::codec::CodecError;

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoder {
    MozJpeg,
    Avif,
    Jxl,
    OxiPng,
    WebP,
    Jpegli,
    Pngquant,
}

impl Encoder {
    pub const ALL: [Encoder; 7] = [
        Encoder::MozJpeg,
        Encoder::Avif,
        Encoder::Jxl,
        Encoder::OxiPng,
        Encoder::WebP,
        Encoder::Jpegli,
        Encoder::Pngquant,
    ];

    /// Name the frontend uses for this encoder.
    pub fn name(self) -> &'static str {
        match self {
            Encoder::MozJpeg => "mozJPEG",
            Encoder::Avif => "avif",
            Encoder::Jxl => "jxl",
            Encoder::OxiPng => "oxiPNG",
            Encoder::WebP => "webP",
            Encoder::Jpegli => "jpegli",
            Encoder::Pngquant => "pngquant",
        }
    }

    pub fn executable(self) -> &'static str {
        match self {
            Encoder::MozJpeg => "cjpeg",
            Encoder::Avif => "avifenc",
            Encoder::Jxl => "cjxl",
            Encoder::OxiPng => "oxipng",
            Encoder::WebP => "cwebp",
            Encoder::Jpegli => "cjpegli",
            Encoder::Pngquant => "pngquant",
        }
    }

    /// Version banner of the installed tool, or `None` when it is missing or
    /// is not the expected build.
    pub fn probe(self, bin_dir: &Path) -> Option<String> {
        let mut invocation = Invocation::new(self.executable(), tool_path(bin_dir, self.executable()));
        match self {
            Encoder::MozJpeg => {
                invocation.arg("-version");
                let output = invocation.output().ok()?;
                let banner = String::from_utf8_lossy(&output.stderr).trim().to_string();
                banner.contains("mozjpeg").then_some(banner)
            }
            Encoder::Avif | Encoder::Jxl | Encoder::OxiPng | Encoder::WebP => {
                invocation.arg(if self == Encoder::WebP { "-version" } else { "--version" });
                let output = invocation.run().ok()?;
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            // Prints usage and exits non-zero without arguments; starting is enough.
            Encoder::Jpegli => invocation.output().ok().map(|_| "Available".to_string()),
            Encoder::Pngquant => {
                let output = invocation.output().ok()?;
                let stderr = String::from_utf8_lossy(&output.stderr);
                let banner = stderr.trim().lines().next()?.to_string();
                banner.contains("pngquant").then_some(banner)
            }
        }
    }
}

/// Encoder selection plus its options, as sent by the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options")]
pub enum EncoderState {
    #[serde(rename = "mozJPEG")]
    MozJpeg(MozJpegOptions),
    #[serde(rename = "avif")]
    Avif(AvifOptions),
    #[serde(rename = "jxl")]
    Jxl(JxlOptions),
    #[serde(rename = "oxiPNG")]
    OxiPng(OxiPngOptions),
    #[serde(rename = "webP")]
    WebP(WebPOptions),
    #[serde(rename = "jpegli")]
    Jpegli(JpegliOptions),
    #[serde(rename = "pngquant")]
    Pngquant(PngquantOptions),
}

impl EncoderState {
    pub fn encoder(&self) -> Encoder {
        match self {
            EncoderState::MozJpeg(_) => Encoder::MozJpeg,
            EncoderState::Avif(_) => Encoder::Avif,
            EncoderState::Jxl(_) => Encoder::Jxl,
            EncoderState::OxiPng(_) => Encoder::OxiPng,
            EncoderState::WebP(_) => Encoder::WebP,
            EncoderState::Jpegli(_) => Encoder::Jpegli,
            EncoderState::Pngquant(_) => Encoder::Pngquant,
        }
    }

    /// Build the command that encodes `input` (a PNG) into `output`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidOption`] when an enumerated option is out
    /// of range.
    pub fn invocation(
        &self,
        bin_dir: &Path,
        input: &Path,
        output: &Path,
    ) -> Result<Invocation, CodecError> {
        let encoder = self.encoder();
        let mut cmd = Invocation::new(encoder.executable(), tool_path(bin_dir, encoder.executable()));
        match self {
            EncoderState::MozJpeg(o) => o.build(&mut cmd, input, output),
            EncoderState::Avif(o) => o.build(&mut cmd, input, output)?,
            EncoderState::Jxl(o) => o.build(&mut cmd, input, output),
            EncoderState::OxiPng(o) => o.build(&mut cmd, input, output),
            EncoderState::WebP(o) => o.build(&mut cmd, input, output)?,
            EncoderState::Jpegli(o) => o.build(&mut cmd, input, output)?,
            EncoderState::Pngquant(o) => o.build(&mut cmd, input, output),
        }
        debug!("Built {} invocation: {cmd}", encoder.name());
        Ok(cmd)
    }
}

#[track_caller]
fn choice<'a>(
    encoder: Encoder,
    option: &str,
    value: OptionValue,
    choices: &[&'a str],
) -> Result<&'a str, CodecError> {
    value.pick(choices).ok_or_else(|| {
        CodecError::invalid_option(
            encoder.name(),
            format!("{option}={value} is not one of {} choices", choices.len()),
        )
    })
}

// ============================================
// MOZJPEG
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MozJpegOptions {
    pub quality: OptionValue,
    pub arithmetic: OptionValue,
    pub progressive: OptionValue,
    pub optimize_coding: OptionValue,
    pub smoothing: OptionValue,
    pub color_space: OptionValue,
    pub quant_table: OptionValue,
    pub auto_subsample: OptionValue,
    pub chroma_subsample: OptionValue,
    pub separate_chroma_quality: OptionValue,
    pub chroma_quality: OptionValue,
}

const JCS_GRAYSCALE: i64 = 1;
const JCS_RGB: i64 = 2;
const JCS_YCBCR: i64 = 3;

impl MozJpegOptions {
    fn build(&self, cmd: &mut Invocation, input: &Path, output: &Path) {
        cmd.arg("-quant-table").arg(self.quant_table.to_string());
        if self.optimize_coding.is_set() {
            cmd.arg("-optimize");
        }
        if self.arithmetic.is_set() {
            cmd.arg("-arithmetic");
        }
        cmd.arg("-smooth").arg(self.smoothing.to_string());

        let color_space = self.color_space.as_i64();
        cmd.arg("-quality");
        if self.separate_chroma_quality.is_set() && color_space == JCS_YCBCR {
            cmd.arg(format!("{},{}", self.quality, self.chroma_quality));
        } else {
            cmd.arg(self.quality.to_string());
        }

        if !self.auto_subsample.is_set() && color_space == JCS_YCBCR {
            cmd.arg("-sample")
                .arg(format!("{0}x{0}", self.chroma_subsample));
        } else if color_space == JCS_RGB {
            cmd.arg("-rgb");
        } else if color_space == JCS_GRAYSCALE {
            cmd.arg("-grayscale");
        }

        if self.progressive.is_set() {
            cmd.arg("-progressive").arg("-dc-scan-opt").arg("2");
        } else {
            cmd.arg("-baseline");
        }
        cmd.arg("-verbose").arg("-outfile").arg(output).arg(input);
    }
}

// ============================================
// AVIF
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvifOptions {
    pub quality: OptionValue,
    pub quality_alpha: OptionValue,
    pub tile_rows_log2: OptionValue,
    pub tile_cols_log2: OptionValue,
    pub speed: OptionValue,
    pub subsample: OptionValue,
    pub chroma_delta_q: OptionValue,
    pub sharpness: OptionValue,
    pub tune: OptionValue,
    pub denoise_level: OptionValue,
    #[serde(rename = "enableSharpYUV")]
    pub enable_sharp_yuv: OptionValue,
}

impl AvifOptions {
    fn build(&self, cmd: &mut Invocation, input: &Path, output: &Path) -> Result<(), CodecError> {
        let yuv = choice(Encoder::Avif, "subsample", self.subsample, &["400", "420", "422", "444"])?;
        cmd.arg("--jobs").arg("all").arg("--yuv").arg(yuv);
        if self.enable_sharp_yuv.is_set() {
            cmd.arg("--sharpyuv");
        }

        let quality = self.quality.as_i64();
        let quality_alpha = self.quality_alpha.as_i64();
        if quality == 100 && (quality_alpha == -1 || quality_alpha == 100) && self.subsample.as_i64() == 3 {
            cmd.arg("--lossless");
        } else {
            let alpha = if quality_alpha == -1 {
                self.quality
            } else {
                self.quality_alpha
            };
            cmd.arg("--qcolor")
                .arg(self.quality.to_string())
                .arg("--qalpha")
                .arg(alpha.to_string())
                .arg("--advanced")
                .arg(format!("sharpness={}", self.sharpness));

            let tune = self.tune.as_i64();
            if tune == 2 || (tune == 0 && quality >= 50) {
                cmd.arg("--advanced").arg("tune=ssim");
            }
            if self.chroma_delta_q.is_set() {
                cmd.arg("--advanced").arg("color:enable-chroma-deltaq=1");
            }
            cmd.arg("--advanced")
                .arg(format!("color:denoise-noise-level={}", self.denoise_level));
        }

        cmd.arg("--tilerowslog2")
            .arg(self.tile_rows_log2.to_string())
            .arg("--tilecolslog2")
            .arg(self.tile_cols_log2.to_string())
            .arg("--speed")
            .arg(self.speed.to_string())
            .arg("--")
            .arg(input)
            .arg(output);
        Ok(())
    }
}

// ============================================
// JPEG XL
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JxlOptions {
    pub effort: OptionValue,
    pub quality: OptionValue,
    pub progressive: OptionValue,
    pub epf: OptionValue,
    pub lossy_palette: OptionValue,
    pub decoding_speed_tier: OptionValue,
    pub photon_noise_iso: OptionValue,
    pub lossy_modular: OptionValue,
}

impl JxlOptions {
    fn build(&self, cmd: &mut Invocation, input: &Path, output: &Path) {
        cmd.arg(input)
            .arg(output)
            .arg("--brotli_effort=11")
            .arg("--num_threads=-1")
            .arg(format!("--effort={}", self.effort))
            .arg(format!("--epf={}", self.epf))
            .arg(format!("--faster_decoding={}", self.decoding_speed_tier))
            .arg(format!("--photon_noise_iso={}", self.photon_noise_iso));

        let mut responsive = false;
        if self.lossy_palette.is_set() {
            cmd.arg("--modular_lossy_palette")
                .arg("--modular_palette_colors=0")
                .arg("--modular_predictor=0")
                .arg("--responsive=0");
            responsive = true;
        }
        let modular = self.lossy_modular.is_set() || self.quality.as_f64() == 100.0;

        cmd.arg(format!("--quality={}", self.quality));
        if self.progressive.is_set() {
            cmd.arg("--progressive");
            responsive = true;
            if !modular {
                cmd.arg("--progressive_dc=1");
            }
        }
        cmd.arg(format!("--modular={}", u8::from(modular)))
            .arg(format!("--responsive={}", u8::from(responsive)))
            .arg("--verbose");
    }
}

// ============================================
// OXIPNG
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxiPngOptions {
    pub level: OptionValue,
    pub interlace: OptionValue,
}

impl OxiPngOptions {
    fn build(&self, cmd: &mut Invocation, input: &Path, output: &Path) {
        cmd.arg("--verbose")
            .arg("--verbose")
            .arg("--opt")
            .arg(self.level.to_string())
            .arg("--interlace")
            .arg(u8::from(self.interlace.is_set()).to_string())
            .arg("--strip")
            .arg("safe")
            .arg("--alpha")
            .arg("--out")
            .arg(output)
            .arg(input);
    }
}

// ============================================
// WEBP
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebPOptions {
    pub quality: OptionValue,
    pub target_size: OptionValue,
    #[serde(rename = "target_PSNR")]
    pub target_psnr: OptionValue,
    pub method: OptionValue,
    pub sns_strength: OptionValue,
    pub filter_strength: OptionValue,
    pub filter_sharpness: OptionValue,
    pub filter_type: OptionValue,
    pub segments: OptionValue,
    pub pass: OptionValue,
    pub preprocessing: OptionValue,
    pub autofilter: OptionValue,
    pub partition_limit: OptionValue,
    pub alpha_compression: OptionValue,
    pub alpha_filtering: OptionValue,
    pub alpha_quality: OptionValue,
    pub lossless: OptionValue,
    pub exact: OptionValue,
    pub image_hint: OptionValue,
    pub emulate_jpeg_size: OptionValue,
    pub near_lossless: OptionValue,
    pub use_sharp_yuv: OptionValue,
}

impl WebPOptions {
    fn build(&self, cmd: &mut Invocation, input: &Path, output: &Path) -> Result<(), CodecError> {
        cmd.arg("-v").arg("-q").arg(self.quality.to_string());
        if self.target_size.is_set() {
            cmd.arg("-size").arg(self.target_size.to_string());
        }
        if self.target_psnr.is_set() {
            cmd.arg("-psnr").arg(self.target_psnr.to_string());
        }
        cmd.arg("-m")
            .arg(self.method.to_string())
            .arg("-sns")
            .arg(self.sns_strength.to_string());
        if self.autofilter.is_set() {
            cmd.arg("-af");
        } else {
            cmd.arg("-f").arg(self.filter_strength.to_string());
        }

        let alpha_filter = choice(
            Encoder::WebP,
            "alpha_filtering",
            self.alpha_filtering,
            &["none", "fast", "best"],
        )?;
        cmd.arg("-sharpness")
            .arg(self.filter_sharpness.to_string())
            .arg(if self.filter_type.is_set() { "-strong" } else { "-nostrong" })
            .arg("-segments")
            .arg(self.segments.to_string())
            .arg("-pass")
            .arg(self.pass.to_string())
            .arg("-pre")
            .arg(self.preprocessing.to_string())
            .arg("-partition_limit")
            .arg(self.partition_limit.to_string())
            .arg("-alpha_method")
            .arg(self.alpha_compression.to_string())
            .arg("-alpha_filter")
            .arg(alpha_filter)
            .arg("-alpha_q")
            .arg(self.alpha_quality.to_string());

        if self.lossless.is_set() {
            cmd.arg("-lossless").arg("-z").arg("9");
            if self.near_lossless.is_set() {
                cmd.arg("-near_lossless").arg(self.near_lossless.to_string());
            }
        }
        if self.exact.is_set() {
            cmd.arg("-exact");
        }
        if self.image_hint.is_set() {
            let hint = choice(
                Encoder::WebP,
                "image_hint",
                self.image_hint,
                &["", "photo", "picture", "graph"],
            )?;
            cmd.arg("-hint").arg(hint);
        }
        if self.emulate_jpeg_size.is_set() {
            cmd.arg("-jpeg_like");
        }
        if self.use_sharp_yuv.is_set() {
            cmd.arg("-sharp_yuv");
        }
        cmd.arg("-mt").arg("-o").arg(output).arg(input);
        Ok(())
    }
}

// ============================================
// JPEGLI
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JpegliOptions {
    pub quality: OptionValue,
    pub subsample: OptionValue,
    pub xyb: OptionValue,
}

impl JpegliOptions {
    fn build(&self, cmd: &mut Invocation, input: &Path, output: &Path) -> Result<(), CodecError> {
        cmd.arg(input)
            .arg(output)
            .arg("--verbose")
            .arg("--verbose")
            .arg(format!("--quality={}", self.quality));
        if self.xyb.is_set() {
            cmd.arg("--xyb");
        } else {
            let sampling = choice(
                Encoder::Jpegli,
                "subsample",
                self.subsample,
                &["420", "422", "440", "444"],
            )?;
            cmd.arg(format!("--chroma_subsampling={sampling}"));
        }
        cmd.arg("--progressive_level=2");
        Ok(())
    }
}

// ============================================
// PNGQUANT
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PngquantOptions {
    pub quality: OptionValue,
    pub effort: OptionValue,
    pub fs: OptionValue,
    pub strip: OptionValue,
}

const PNGQUANT_MAX_SPEED: i64 = 12;

impl PngquantOptions {
    fn build(&self, cmd: &mut Invocation, input: &Path, output: &Path) {
        cmd.arg("--output")
            .arg(output)
            .arg("--quality")
            .arg(format!("0-{}", self.quality))
            .arg("--speed")
            .arg((PNGQUANT_MAX_SPEED - self.effort.as_i64()).to_string());
        if !self.fs.is_set() {
            cmd.arg("--nofs");
        }
        if self.strip.is_set() {
            cmd.arg("--strip");
        }
        cmd.arg("--verbose").arg("--").arg(input);
    }
}
