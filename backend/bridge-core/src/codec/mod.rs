//! External encoder and metric tools.
//!
//! Every tool is an executable in the configured tools directory. Probing
//! results are computed once per [`Toolbox`] and cached; the frontend asks for
//! them on startup and they do not change while the process runs.

pub mod encoders;
pub mod invocation;
pub mod metrics;
pub mod options;
pub mod png;

pub use encoders::{Encoder, EncoderState};
pub use invocation::Invocation;
pub use metrics::Metric;
pub use options::OptionValue;
pub use png::ImageData;

use crate::error::codec::CodecError;

use std::collections::BTreeMap;
use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::thread;

use log::{info, warn};
use tempfile::TempDir;

const SCRATCH_PREFIX: &str = "squoosh-";

pub(crate) fn tool_path(bin_dir: &Path, executable: &str) -> PathBuf {
    bin_dir.join(format!("{executable}{EXE_SUFFIX}"))
}

#[derive(Debug)]
pub struct Toolbox {
    bin_dir: PathBuf,
    scratch_dir: Option<PathBuf>,
    codecs: OnceLock<BTreeMap<String, Option<String>>>,
    metrics: OnceLock<BTreeMap<String, bool>>,
}

impl Toolbox {
    pub fn new(bin_dir: impl Into<PathBuf>, scratch_dir: Option<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            scratch_dir,
            codecs: OnceLock::new(),
            metrics: OnceLock::new(),
        }
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// `{encoderName: version banner}`, `None` for missing encoders.
    pub fn check_codecs(&self) -> &BTreeMap<String, Option<String>> {
        self.codecs.get_or_init(|| {
            let probed: BTreeMap<String, Option<String>> = thread::scope(|scope| {
                let probes: Vec<_> = Encoder::ALL
                    .iter()
                    .map(|&encoder| {
                        scope.spawn(move || (encoder.name().to_string(), encoder.probe(&self.bin_dir)))
                    })
                    .collect();
                probes.into_iter().filter_map(|probe| probe.join().ok()).collect()
            });

            let available = probed.values().filter(|v| v.is_some()).count();
            info!(
                "Probed {} encoders in {}: {available} available",
                probed.len(),
                self.bin_dir.display()
            );
            probed
        })
    }

    /// `{metricName: available}`.
    pub fn check_metrics(&self) -> &BTreeMap<String, bool> {
        self.metrics.get_or_init(|| {
            Metric::ALL
                .iter()
                .map(|&metric| (metric.name().to_string(), metric.is_available(&self.bin_dir)))
                .collect()
        })
    }

    /// Private directory for one invocation's temporary images; removed with
    /// everything in it when dropped.
    pub fn workspace(&self) -> Result<TempDir, CodecError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let created = match &self.scratch_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        };
        created.map_err(|e| CodecError::io("creating scratch directory", e))
    }

    /// Run every available metric in parallel; unavailable ones map to `None`.
    pub fn compute_metrics(
        &self,
        reference: &Path,
        candidate: &Path,
    ) -> Result<BTreeMap<String, Option<f64>>, CodecError> {
        let available = self.check_metrics();

        thread::scope(|scope| {
            let running: Vec<_> = Metric::ALL
                .iter()
                .filter(|metric| available.get(metric.name()).copied().unwrap_or(false))
                .map(|&metric| {
                    (
                        metric,
                        scope.spawn(move || metric.compute(&self.bin_dir, reference, candidate)),
                    )
                })
                .collect();

            let mut scores: BTreeMap<String, Option<f64>> = available
                .iter()
                .filter(|(_, ok)| !**ok)
                .map(|(name, _)| (name.clone(), None))
                .collect();

            for (metric, handle) in running {
                let score = handle.join().map_err(|_| {
                    warn!("Metric {} panicked", metric.name());
                    CodecError::parse(metric.name(), "metric thread panicked")
                })??;
                scores.insert(metric.name().to_string(), Some(score));
            }
            Ok(scores)
        })
    }
}
