use std::path::Path;

use crate::error::{ReadError, Result};
use crate::text;

pub const NUM_JOINTS: usize = 7;

const KIND: &str = "joint state";

/// One snapshot of the arm's joint state, in the order rows appear on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct JointState {
    pub actual_position: [f32; NUM_JOINTS],
    pub actual_velocity: [f32; NUM_JOINTS],
    pub actual_effort: [f32; NUM_JOINTS],
    pub commanded_position: [f32; NUM_JOINTS],
    pub commanded_velocity: [f32; NUM_JOINTS],
    pub commanded_acceleration: [f32; NUM_JOINTS],
    /// End-effector target as position + quaternion.
    pub target_end_effector: [f32; NUM_JOINTS],
}

pub fn read_joint_state(path: &Path) -> Result<JointState> {
    let contents = text::read_to_string(path)?;
    parse_joint_state(&contents, path)
}

fn parse_joint_state(contents: &str, path: &Path) -> Result<JointState> {
    let mut rows = text::rows(contents);
    let mut next = |name: &str| -> Result<[f32; NUM_JOINTS]> {
        let tokens = rows
            .next()
            .ok_or_else(|| ReadError::malformed(KIND, path, format!("missing {} row", name)))?;
        let values = text::numeric_row(&tokens)
            .map_err(|e| ReadError::malformed(KIND, path, format!("{} row: {}", name, e)))?;

        values.as_slice().try_into().map_err(|_| {
            ReadError::malformed(
                KIND,
                path,
                format!(
                    "{} row has {} values, expected {}",
                    name,
                    values.len(),
                    NUM_JOINTS
                ),
            )
        })
    };

    Ok(JointState {
        actual_position: next("actual position")?,
        actual_velocity: next("actual velocity")?,
        actual_effort: next("actual effort")?,
        commanded_position: next("commanded position")?,
        commanded_velocity: next("commanded velocity")?,
        commanded_acceleration: next("commanded acceleration")?,
        target_end_effector: next("target end-effector")?,
    })
}
