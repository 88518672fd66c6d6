//! Perceptual quality metrics computed by external tools.

use crate::codec::invocation::Invocation;
use crate::codec::tool_path;
use crate::error::codec::CodecError;

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

const BUTTERAUGLI_NORM_PATTERN: &str = r"^\s*3-norm:\s*(?P<score>\S+)\s*$";
const NORM_CAPTURE_SCORE: &str = "score";

static BUTTERAUGLI_NORM_REGEX: OnceLock<Regex> = OnceLock::new();

fn butteraugli_norm_regex() -> &'static Regex {
    BUTTERAUGLI_NORM_REGEX
        .get_or_init(|| Regex::new(BUTTERAUGLI_NORM_PATTERN).expect("valid regex pattern"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Dssim,
    Butteraugli,
    Ssimulacra2,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Dssim, Metric::Butteraugli, Metric::Ssimulacra2];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Dssim => "dssim",
            Metric::Butteraugli => "butteraugli",
            Metric::Ssimulacra2 => "ssimulacra2",
        }
    }

    pub fn executable(self) -> &'static str {
        self.name()
    }

    pub fn is_available(self, bin_dir: &Path) -> bool {
        tool_path(bin_dir, self.executable()).is_file()
    }

    pub fn invocation(self, bin_dir: &Path, reference: &Path, candidate: &Path) -> Invocation {
        let mut cmd = Invocation::new(self.executable(), tool_path(bin_dir, self.executable()));
        cmd.arg(reference).arg(candidate);
        cmd
    }

    /// Score for `candidate` measured against `reference`.
    pub fn compute(self, bin_dir: &Path, reference: &Path, candidate: &Path) -> Result<f64, CodecError> {
        let output = self.invocation(bin_dir, reference, candidate).run()?;
        self.parse_output(String::from_utf8_lossy(&output.stdout).trim())
    }

    /// Extract the score from the tool's trimmed stdout.
    ///
    /// - dssim: `<score>\t<file>`
    /// - butteraugli: max-norm on the first line, `3-norm: <score>` on the second
    /// - ssimulacra2: the bare score
    pub fn parse_output(self, output: &str) -> Result<f64, CodecError> {
        let field = match self {
            Metric::Dssim => output.split('\t').next().unwrap_or_default(),
            Metric::Butteraugli => output
                .lines()
                .nth(1)
                .and_then(|line| butteraugli_norm_regex().captures(line))
                .and_then(|captures| captures.name(NORM_CAPTURE_SCORE))
                .map(|score| score.as_str())
                .ok_or_else(|| CodecError::parse(self.name(), format!("no 3-norm line in {output:?}")))?,
            Metric::Ssimulacra2 => output,
        };

        field
            .trim()
            .parse::<f64>()
            .map_err(|e| CodecError::parse(self.name(), format!("'{field}': {e}")))
    }
}
