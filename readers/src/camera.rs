use std::path::Path;

use crate::error::{ReadError, Result};
use crate::text;
use crate::transform::Transform;

const KIND: &str = "camera";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraCalibration {
    pub model_view: Transform,
    pub camera_params: Transform,
}

/// Reads a camera data file: a header row, four modelview rows, a separator
/// row and four camera-parameter rows.
pub fn read_camera_calibration(path: &Path) -> Result<CameraCalibration> {
    let contents = text::read_to_string(path)?;
    parse_camera_calibration(&contents, path)
}

fn parse_camera_calibration(contents: &str, path: &Path) -> Result<CameraCalibration> {
    // Positional format: blank rows still count.
    let rows: Vec<Vec<&str>> = contents
        .lines()
        .map(|line| line.split_whitespace().collect())
        .collect();
    if rows.len() < 10 {
        return Err(ReadError::malformed(
            KIND,
            path,
            format!("expected 10 rows, found {}", rows.len()),
        ));
    }

    Ok(CameraCalibration {
        model_view: matrix(&rows[1..5], "modelview", path)?,
        camera_params: matrix(&rows[6..10], "camera parameter", path)?,
    })
}

fn matrix(rows: &[Vec<&str>], name: &str, path: &Path) -> Result<Transform> {
    let values = rows
        .iter()
        .flatten()
        .map(|tok| tok.parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ReadError::malformed(KIND, path, format!("{} matrix: {}", name, e)))?;

    Transform::from_row_major(&values).ok_or_else(|| {
        ReadError::malformed(
            KIND,
            path,
            format!("{} matrix has {} values, expected 16", name, values.len()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMERA: &str = "\
modelview
0 -1 0 0.1
-1 0 0 0.2
0 0  -1 1.5
0 0 0 1
camparam
525 0 319.5 0
0  525 239.5 0
0 0 1 0
0 0 0 1
";

    #[test]
    fn test_reads_both_matrices() {
        let camera = parse_camera_calibration(CAMERA, Path::new("cameradata.txt")).unwrap();
        assert_eq!(camera.model_view.0[0], [0.0, -1.0, 0.0, 0.1]);
        assert_eq!(camera.model_view.0[2], [0.0, 0.0, -1.0, 1.5]);
        assert_eq!(camera.camera_params.0[1], [0.0, 525.0, 239.5, 0.0]);
        assert_eq!(camera.camera_params.0[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_truncated_file_fails() {
        let truncated: String = CAMERA.lines().take(7).collect::<Vec<_>>().join("\n");
        let err = parse_camera_calibration(&truncated, Path::new("c.txt")).unwrap_err();
        assert!(err.to_string().contains("expected 10 rows, found 7"));
    }
}
