use std::path::Path;

use crate::error::{ReadError, Result};
use crate::text;

/// Name of the per-episode metadata file written after post-processing.
pub const STATS_FILE: &str = "postprocessstats.txt";

/// Reads the number of recorded frames, the first token of the stats file.
pub fn read_frame_count(path: &Path) -> Result<usize> {
    let contents = text::read_to_string(path)?;
    let token = contents
        .split_whitespace()
        .next()
        .ok_or_else(|| ReadError::malformed("stats", path, "empty file"))?;

    // Written as a float by some recorders.
    let count: f64 = token
        .parse()
        .map_err(|_| ReadError::malformed("stats", path, format!("invalid frame count '{}'", token)))?;
    if !count.is_finite() || count < 0.0 {
        return Err(ReadError::malformed(
            "stats",
            path,
            format!("invalid frame count '{}'", token),
        ));
    }

    Ok(count as usize)
}
