use std::path::Path;

use ahash::AHashMap;

use crate::error::{ReadError, Result};
use crate::text;
use crate::transform::Transform;

const KIND: &str = "pose";

/// Per-part rigid transforms for one frame, keyed by mesh id.
pub type PoseSet = AHashMap<i32, Transform>;

pub fn read_pose_set(path: &Path) -> Result<PoseSet> {
    let contents = text::read_to_string(path)?;
    parse_pose_set(&contents, path)
}

fn parse_pose_set(contents: &str, path: &Path) -> Result<PoseSet> {
    let rows = text::rows(contents)
        .map(|tokens| text::numeric_row(&tokens))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ReadError::malformed(KIND, path, e))?;

    let pairs = rows.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        log::debug!("Ignoring unpaired trailing row in {}", path.display());
    }

    let mut poses = PoseSet::with_capacity(rows.len() / 2);
    for pair in pairs {
        let id = *pair[0]
            .first()
            .ok_or_else(|| ReadError::malformed(KIND, path, "empty mesh id row"))?
            as i32;
        let transform = decode_transform(&pair[1]).ok_or_else(|| {
            ReadError::malformed(
                KIND,
                path,
                format!("mesh {} has {} transform values, expected 12", id, pair[1].len()),
            )
        })?;
        poses.insert(id, transform);
    }

    Ok(poses)
}

/// Each stored row is `[t_r, R_r0, R_r1, R_r2]`: translation first, then the
/// rotation row.
fn decode_transform(values: &[f32]) -> Option<Transform> {
    if values.len() != 12 {
        return None;
    }

    let mut rotation = [[0.0; 3]; 3];
    let mut translation = [0.0; 3];
    for (r, row) in values.chunks_exact(4).enumerate() {
        translation[r] = row[0];
        rotation[r].copy_from_slice(&row[1..4]);
    }

    Some(Transform::from_parts(rotation, translation))
}
