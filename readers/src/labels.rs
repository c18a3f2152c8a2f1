use std::path::Path;

use crate::error::{ReadError, Result};
use crate::text;

const KIND: &str = "labels";

/// Names of the tracked frames and the mesh id assigned to each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartLabels {
    pub frames: Vec<String>,
    pub mesh_ids: Vec<i32>,
}

pub fn read_part_labels(path: &Path) -> Result<PartLabels> {
    let contents = text::read_to_string(path)?;
    parse_part_labels(&contents, path)
}

fn parse_part_labels(contents: &str, path: &Path) -> Result<PartLabels> {
    let mut rows = text::rows(contents);

    let frames: Vec<String> = rows
        .next()
        .ok_or_else(|| ReadError::malformed(KIND, path, "missing frame names row"))?
        .into_iter()
        .map(str::to_string)
        .collect();

    let mesh_ids = rows
        .next()
        .ok_or_else(|| ReadError::malformed(KIND, path, "missing mesh ids row"))?
        .into_iter()
        .map(|tok| {
            tok.parse::<i32>()
                .map_err(|_| ReadError::malformed(KIND, path, format!("invalid mesh id '{}'", tok)))
        })
        .collect::<Result<Vec<_>>>()?;

    if frames.len() != mesh_ids.len() {
        log::warn!(
            "{}: {} frame names but {} mesh ids",
            path.display(),
            frames.len(),
            mesh_ids.len()
        );
    }

    Ok(PartLabels { frames, mesh_ids })
}
