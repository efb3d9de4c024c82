use crate::error::{Result, RevoiceError};
use super::CommandOutput;

/// Parse the duration printed by `ffprobe -show_entries format=duration`.
///
/// Empty, non-numeric, non-finite or negative output is a probe failure; the
/// error carries whatever diagnostics the tool printed.
pub fn parse_duration(output: &CommandOutput) -> Result<f64> {
    let printed = output.stdout.trim();
    let diagnostics = || {
        let stderr = output.stderr.trim();
        if stderr.is_empty() {
            format!("FFprobe error: unexpected output {:?}", printed)
        } else {
            format!("FFprobe error: {}", stderr)
        }
    };

    if printed.is_empty() {
        return Err(RevoiceError::MediaProbe(diagnostics()));
    }

    match printed.lines().next().map(str::trim).and_then(|line| line.parse::<f64>().ok()) {
        Some(duration) if duration.is_finite() && duration >= 0.0 => Ok(duration),
        _ => Err(RevoiceError::MediaProbe(diagnostics())),
    }
}
