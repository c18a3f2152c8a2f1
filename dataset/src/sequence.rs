use readers::{
    read_depth_image, read_flow_image, read_joint_state, read_label_image, read_pose_set,
    JointState, PoseSet, Resolution, NUM_JOINTS,
};

use crate::catalog::EpisodeDescriptor;
use crate::config::{ControlMode, LoadOptions, FRAME_RATE};
use crate::error::{DatasetError, Result};
use crate::frames::{resolve_window, FrameSet};

pub const FLOW_CHANNELS: usize = 3;

/// Values per stored part pose (a 3x4 block).
pub const POSE_SIZE: usize = 12;

/// One training example: a window of synchronized frames from one episode.
///
/// Frame-aligned stacks hold `window + 1` entries, step-aligned stacks
/// (flows and controls) hold `window`. All buffers are flat and row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub window: usize,
    pub resolution: Resolution,
    /// Tracked meshes plus the background.
    pub num_parts: usize,
    pub control_width: usize,
    /// `[window + 1, 1, H, W]`
    pub depths: Vec<f32>,
    /// `[window + 1, 1, H, W]`
    pub labels: Vec<u8>,
    /// `[window, 3, H, W]`, flow from the first frame to each step.
    pub flows: Vec<f32>,
    /// `[window + 1, 7]`
    pub actual_configs: Vec<f32>,
    /// `[window + 1, 7]`
    pub commanded_configs: Vec<f32>,
    /// `[window, control_width]`
    pub controls: Vec<f32>,
    /// `[window + 1, num_parts, 3, 4]`, part 0 is the background.
    pub poses: Vec<f32>,
}

impl Sequence {
    /// Allocates all stacks at their final size, zero filled.
    pub fn zeroed(
        window: usize,
        resolution: Resolution,
        num_meshes: usize,
        control_width: usize,
    ) -> Self {
        let frames = window + 1;
        let pixels = resolution.pixels();
        let num_parts = num_meshes + 1;

        Self {
            window,
            resolution,
            num_parts,
            control_width,
            depths: vec![0.0; frames * pixels],
            labels: vec![0; frames * pixels],
            flows: vec![0.0; window * FLOW_CHANNELS * pixels],
            actual_configs: vec![0.0; frames * NUM_JOINTS],
            commanded_configs: vec![0.0; frames * NUM_JOINTS],
            controls: vec![0.0; window * control_width],
            poses: vec![0.0; frames * num_parts * POSE_SIZE],
        }
    }

    pub fn depths_shape(&self) -> [usize; 4] {
        let Resolution { height, width } = self.resolution;
        [self.window + 1, 1, height, width]
    }

    pub fn flows_shape(&self) -> [usize; 4] {
        let Resolution { height, width } = self.resolution;
        [self.window, FLOW_CHANNELS, height, width]
    }

    pub fn configs_shape(&self) -> [usize; 2] {
        [self.window + 1, NUM_JOINTS]
    }

    pub fn controls_shape(&self) -> [usize; 2] {
        [self.window, self.control_width]
    }

    pub fn poses_shape(&self) -> [usize; 4] {
        [self.window + 1, self.num_parts, 3, 4]
    }

    pub fn depth(&self, k: usize) -> &[f32] {
        let n = self.resolution.pixels();
        &self.depths[k * n..(k + 1) * n]
    }

    pub fn label(&self, k: usize) -> &[u8] {
        let n = self.resolution.pixels();
        &self.labels[k * n..(k + 1) * n]
    }

    pub fn flow(&self, k: usize) -> &[f32] {
        let n = FLOW_CHANNELS * self.resolution.pixels();
        &self.flows[k * n..(k + 1) * n]
    }

    pub fn control(&self, k: usize) -> &[f32] {
        &self.controls[k * self.control_width..(k + 1) * self.control_width]
    }

    pub fn actual_config(&self, k: usize) -> &[f32] {
        &self.actual_configs[k * NUM_JOINTS..(k + 1) * NUM_JOINTS]
    }

    pub fn commanded_config(&self, k: usize) -> &[f32] {
        &self.commanded_configs[k * NUM_JOINTS..(k + 1) * NUM_JOINTS]
    }

    /// 3x4 pose of `part` at frame `k`, row-major.
    pub fn pose(&self, k: usize, part: usize) -> &[f32] {
        let base = (k * self.num_parts + part) * POSE_SIZE;
        &self.poses[base..base + POSE_SIZE]
    }
}

/// Loads windows of an episode into [`Sequence`]s with fixed options.
#[derive(Debug, Clone)]
pub struct SequenceAssembler {
    options: LoadOptions,
}

impl SequenceAssembler {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Loads the window of `episode` starting at raw frame `start`.
    ///
    /// Any missing or malformed file fails the whole window.
    pub fn load(&self, episode: &EpisodeDescriptor, start: usize) -> Result<Sequence> {
        let end = episode.window_end(start);
        if end >= episode.num_frames {
            return Err(DatasetError::WindowOutOfRange {
                root: episode.root.clone(),
                start,
                end,
                last: episode.num_frames.saturating_sub(1),
            });
        }

        let opts = &self.options;
        let window = episode.window;
        let frames = resolve_window(
            &episode.root,
            &episode.suffix,
            episode.stride,
            window,
            start,
        );

        let mut seq = Sequence::zeroed(
            window,
            opts.resolution,
            opts.mesh_ids.len(),
            opts.control.width(),
        );

        for (k, frame) in frames.iter().enumerate() {
            self.load_frame(&mut seq, k, frame)?;
        }

        let dt = step_duration(episode.stride);
        match opts.control {
            ControlMode::ActualDiffVelocity => {
                seq.controls = finite_difference(&seq.actual_configs, window, dt);
            }
            ControlMode::CommandedDiffVelocity => {
                seq.controls = finite_difference(&seq.commanded_configs, window, dt);
            }
            _ => {}
        }

        Ok(seq)
    }

    fn load_frame(&self, seq: &mut Sequence, k: usize, frame: &FrameSet) -> Result<()> {
        let opts = &self.options;
        let pixels = opts.resolution.pixels();

        let depth = read_depth_image(&frame.depth, opts.resolution, opts.scale)?;
        seq.depths[k * pixels..(k + 1) * pixels].copy_from_slice(&depth.data);

        let label = read_label_image(&frame.label, opts.resolution)?;
        seq.labels[k * pixels..(k + 1) * pixels].copy_from_slice(&label.data);

        let state = read_joint_state(&frame.state)?;
        let joints = k * NUM_JOINTS..(k + 1) * NUM_JOINTS;
        seq.actual_configs[joints.clone()].copy_from_slice(&state.actual_position);
        seq.commanded_configs[joints].copy_from_slice(&state.commanded_position);

        let poses = read_pose_set(&frame.pose)?;
        self.write_poses(seq, k, &poses, frame)?;

        if k < seq.window {
            let flow = read_flow_image(&frame.flow, opts.resolution, opts.scale)?;
            let n = FLOW_CHANNELS * pixels;
            seq.flows[k * n..(k + 1) * n].copy_from_slice(&flow.data);

            self.write_control(seq, k, &state);
        }

        Ok(())
    }

    /// Stores the background identity followed by every tracked part seen
    /// through the camera's modelview.
    fn write_poses(
        &self,
        seq: &mut Sequence,
        k: usize,
        poses: &PoseSet,
        frame: &FrameSet,
    ) -> Result<()> {
        let base = k * seq.num_parts * POSE_SIZE;
        for r in 0..3 {
            seq.poses[base + r * 4 + r] = 1.0;
        }

        for (j, &mesh_id) in self.options.mesh_ids.iter().enumerate() {
            let transform = poses.get(&mesh_id).ok_or_else(|| DatasetError::MissingMesh {
                mesh_id,
                path: frame.pose.clone(),
            })?;
            let projected = self.options.camera.model_view * *transform;

            let part = base + (j + 1) * POSE_SIZE;
            for (r, row) in projected.top_rows().iter().enumerate() {
                seq.poses[part + r * 4..part + r * 4 + 4].copy_from_slice(row);
            }
        }

        Ok(())
    }

    fn write_control(&self, seq: &mut Sequence, k: usize, state: &JointState) {
        let width = seq.control_width;
        let row = &mut seq.controls[k * width..(k + 1) * width];

        match self.options.control {
            ControlMode::CommandedVelocity => row.copy_from_slice(&state.commanded_velocity),
            ControlMode::ActualVelocity => row.copy_from_slice(&state.actual_velocity),
            ControlMode::CommandedAcceleration => {
                row.copy_from_slice(&state.commanded_acceleration)
            }
            ControlMode::CommandedBoth => {
                row[..NUM_JOINTS].copy_from_slice(&state.commanded_velocity);
                row[NUM_JOINTS..].copy_from_slice(&state.commanded_acceleration);
            }
            // Derived from the whole config stack once every frame is loaded.
            ControlMode::ActualDiffVelocity | ControlMode::CommandedDiffVelocity => {}
        }
    }
}

/// Time between window positions for a stride in raw frames. Computed in
/// double precision and rounded once.
pub fn step_duration(stride: usize) -> f32 {
    (stride as f64 / FRAME_RATE) as f32
}

/// `(configs[k + 1] - configs[k]) / dt` for each of the `window` steps.
pub fn finite_difference(configs: &[f32], window: usize, dt: f32) -> Vec<f32> {
    let mut controls = vec![0.0; window * NUM_JOINTS];
    for k in 0..window {
        for j in 0..NUM_JOINTS {
            let next = configs[(k + 1) * NUM_JOINTS + j];
            let prev = configs[k * NUM_JOINTS + j];
            controls[k * NUM_JOINTS + j] = (next - prev) / dt;
        }
    }
    controls
}
