use std::ops::Mul;

/// Row-major 4x4 homogeneous transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub [[f32; 4]; 4]);

impl Transform {
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Builds a transform from 16 values in row-major order.
    pub fn from_row_major(values: &[f32]) -> Option<Self> {
        if values.len() != 16 {
            return None;
        }

        let mut m = [[0.0; 4]; 4];
        for (r, row) in m.iter_mut().enumerate() {
            row.copy_from_slice(&values[r * 4..r * 4 + 4]);
        }
        Some(Self(m))
    }

    /// Builds `[R | t; 0 0 0 1]`.
    pub fn from_parts(rotation: [[f32; 3]; 3], translation: [f32; 3]) -> Self {
        let mut m = Self::IDENTITY.0;
        for r in 0..3 {
            m[r][..3].copy_from_slice(&rotation[r]);
            m[r][3] = translation[r];
        }
        Self(m)
    }

    pub fn rotation(&self) -> [[f32; 3]; 3] {
        let m = &self.0;
        [
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ]
    }

    pub fn translation(&self) -> [f32; 3] {
        [self.0[0][3], self.0[1][3], self.0[2][3]]
    }

    /// The upper 3x4 block, as stored per part in a sequence.
    pub fn top_rows(&self) -> [[f32; 4]; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        let mut out = [[0.0f32; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[r][k] * rhs.0[k][c]).sum();
            }
        }
        Transform(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_neutral() {
        let t = Transform::from_parts(
            [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            [0.5, -0.25, 2.0],
        );
        assert_eq!(Transform::IDENTITY * t, t);
        assert_eq!(t * Transform::IDENTITY, t);
    }

    #[test]
    fn test_composition_applies_right_first() {
        let shift = Transform::from_parts(
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            [1.0, 0.0, 0.0],
        );
        let turn = Transform::from_parts(
            [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0, 0.0, 0.0],
        );

        // Rotating the shift moves the translation onto +y.
        assert_eq!((turn * shift).translation(), [0.0, 1.0, 0.0]);
        assert_eq!((shift * turn).translation(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_row_major_rejects_wrong_length() {
        assert!(Transform::from_row_major(&[0.0; 12]).is_none());
        let m = Transform::from_row_major(&(0..16).map(|v| v as f32).collect::<Vec<_>>()).unwrap();
        assert_eq!(m.0[1], [4.0, 5.0, 6.0, 7.0]);
    }
}
