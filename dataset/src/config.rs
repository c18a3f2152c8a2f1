use std::fmt;
use std::str::FromStr;

use readers::{CameraCalibration, Resolution, DEFAULT_SCALE, NUM_JOINTS};

use crate::error::{DatasetError, Result};

/// Frame rate the episodes were recorded at.
pub const FRAME_RATE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl FromStr for Split {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            other => Err(DatasetError::UnknownSplit(other.to_string())),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        };
        f.write_str(name)
    }
}

/// Which robot-state quantity is used as the control target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Commanded joint velocities.
    CommandedVelocity,
    /// Measured joint velocities.
    ActualVelocity,
    /// Commanded joint accelerations.
    CommandedAcceleration,
    /// Commanded velocities followed by commanded accelerations.
    CommandedBoth,
    /// Finite difference of measured joint positions.
    ActualDiffVelocity,
    /// Finite difference of commanded joint positions.
    CommandedDiffVelocity,
}

impl ControlMode {
    /// Values per control step.
    pub fn width(&self) -> usize {
        match self {
            ControlMode::CommandedBoth => 2 * NUM_JOINTS,
            _ => NUM_JOINTS,
        }
    }

    pub fn is_finite_difference(&self) -> bool {
        matches!(
            self,
            ControlMode::ActualDiffVelocity | ControlMode::CommandedDiffVelocity
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ControlMode::CommandedVelocity => "comvel",
            ControlMode::ActualVelocity => "actvel",
            ControlMode::CommandedAcceleration => "comacc",
            ControlMode::CommandedBoth => "comboth",
            ControlMode::ActualDiffVelocity => "actdiffvel",
            ControlMode::CommandedDiffVelocity => "comdiffvel",
        }
    }
}

impl FromStr for ControlMode {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "comvel" => Ok(ControlMode::CommandedVelocity),
            "actvel" => Ok(ControlMode::ActualVelocity),
            "comacc" => Ok(ControlMode::CommandedAcceleration),
            "comboth" => Ok(ControlMode::CommandedBoth),
            "actdiffvel" => Ok(ControlMode::ActualDiffVelocity),
            "comdiffvel" => Ok(ControlMode::CommandedDiffVelocity),
            other => Err(DatasetError::UnknownControlMode(other.to_string())),
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How episodes are discovered and split.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Inserted between the modality name and the frame index in image file names.
    pub suffix: String,
    /// Raw frames between consecutive window positions.
    pub stride: usize,
    /// Number of steps per window.
    pub window: usize,
    pub train_fraction: f64,
    pub val_fraction: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            suffix: String::new(),
            stride: 1,
            window: 1,
            train_fraction: 0.6,
            val_fraction: 0.15,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        let (train, val) = (self.train_fraction, self.val_fraction);
        if !(0.0..=1.0).contains(&train) || !(0.0..=1.0).contains(&val) {
            return Err(DatasetError::InvalidConfig(format!(
                "split fractions must lie in [0, 1], got train={} val={}",
                train, val
            )));
        }
        if train + val >= 1.0 {
            return Err(DatasetError::InvalidConfig(format!(
                "train + val fractions must be below 1, got {} + {}",
                train, val
            )));
        }
        if self.stride == 0 || self.window == 0 {
            return Err(DatasetError::InvalidConfig(format!(
                "stride and window must be positive, got stride={} window={}",
                self.stride, self.window
            )));
        }
        Ok(())
    }
}

/// Fixed options for materializing sequences. Shared read-only by all loads.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub resolution: Resolution,
    /// Multiplier from stored 16-bit samples to physical units.
    pub scale: f32,
    /// Parts whose poses are emitted, in output order after the background.
    pub mesh_ids: Vec<i32>,
    pub control: ControlMode,
    pub camera: CameraCalibration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::new(240, 320),
            scale: DEFAULT_SCALE,
            mesh_ids: Vec::new(),
            control: ControlMode::CommandedVelocity,
            camera: CameraCalibration::default(),
        }
    }
}
