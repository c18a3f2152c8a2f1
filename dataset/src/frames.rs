use std::path::{Path, PathBuf};

/// Files making up one window position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    /// Raw frame index within the episode.
    pub frame: usize,
    pub depth: PathBuf,
    pub label: PathBuf,
    pub state: PathBuf,
    pub next_state: PathBuf,
    pub pose: PathBuf,
    pub next_pose: PathBuf,
    pub flow: PathBuf,
}

impl FrameSet {
    /// Files of this position that do not exist. The flow of the final window
    /// position is never loaded and is skipped when `with_flow` is false.
    pub fn missing(&self, with_flow: bool) -> Vec<&Path> {
        let mut paths = vec![
            self.depth.as_path(),
            self.label.as_path(),
            self.state.as_path(),
            self.pose.as_path(),
        ];
        if with_flow {
            paths.push(self.flow.as_path());
        }
        paths.into_iter().filter(|p| !p.is_file()).collect()
    }
}

/// Resolves the `window + 1` frame sets of a window starting at `start`.
///
/// Position `k` reads raw frame `start + k * stride`. Its flow lives in
/// `flow_<(k + 1) * stride>/` and is always named after `start`: flow is
/// accumulated from the first frame of the window to each step boundary.
pub fn resolve_window(
    root: &Path,
    suffix: &str,
    stride: usize,
    window: usize,
    start: usize,
) -> Vec<FrameSet> {
    let mut frames = Vec::with_capacity(window + 1);
    let mut step_id = stride;

    for k in 0..=window {
        let frame = start + k * stride;
        frames.push(FrameSet {
            frame,
            depth: root.join(format!("depth{}{}.png", suffix, frame)),
            label: root.join(format!("labels{}{}.png", suffix, frame)),
            state: root.join(format!("state{}.txt", frame)),
            next_state: root.join(format!("state{}.txt", frame + 1)),
            pose: root.join(format!("se3state{}.txt", frame)),
            next_pose: root.join(format!("se3state{}.txt", frame + 1)),
            flow: root
                .join(format!("flow_{}", step_id))
                .join(format!("flow{}{}.png", suffix, start)),
        });
        step_id += stride;
    }

    frames
}
