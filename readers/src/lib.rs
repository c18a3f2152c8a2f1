pub mod camera;
pub mod error;
pub mod labels;
pub mod pose;
pub mod raster;
pub mod state;
pub mod stats;
mod text;
pub mod transform;

pub use camera::{read_camera_calibration, CameraCalibration};
pub use error::{ReadError, Result};
pub use labels::{read_part_labels, PartLabels};
pub use pose::{read_pose_set, PoseSet};
pub use raster::{
    read_depth_image, read_flow_image, read_label_image, resize_nearest, Raster, Resolution,
    DEFAULT_SCALE,
};
pub use state::{read_joint_state, JointState, NUM_JOINTS};
pub use stats::{read_frame_count, STATS_FILE};
pub use transform::Transform;
