#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{ImageBuffer, Luma, Rgb};
use readers::Resolution;

pub const MESH_IDS: [i32; 2] = [3, 8];

/// Stored depth sample of `frame` at `pixel`.
pub fn depth_value(frame: usize, pixel: usize) -> u16 {
    (frame * 10 + pixel) as u16
}

pub fn label_value(frame: usize, pixel: usize) -> u8 {
    ((frame + pixel) % 7) as u8
}

/// Stored flow sample of `channel` (0 = x) at `pixel` in `flow_<step_id>`.
pub fn flow_value(step_id: usize, channel: usize, pixel: usize) -> u16 {
    (step_id * 100 + channel * 10 + pixel) as u16
}

/// Value of `joint` in state row `row` of `frame`.
pub fn state_value(frame: usize, row: usize, joint: usize) -> f32 {
    frame as f32 * 0.5 + row as f32 * 0.01 + joint as f32 * 0.001
}

pub fn part_translation(frame: usize, mesh_id: i32) -> [f32; 3] {
    [frame as f32, mesh_id as f32, 0.5]
}

pub fn write_stats(episode: &Path, num_frames: usize) {
    fs::create_dir_all(episode).unwrap();
    fs::write(episode.join("postprocessstats.txt"), format!("{} 30\n", num_frames)).unwrap();
}

/// Writes the depth, label, state and pose files of one raw frame.
pub fn write_frame(episode: &Path, suffix: &str, frame: usize, res: Resolution) {
    fs::create_dir_all(episode).unwrap();
    let (w, h) = (res.width as u32, res.height as u32);
    let idx = |x: u32, y: u32| (y * w + x) as usize;

    let depth = ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(w, h, |x, y| {
        Luma([depth_value(frame, idx(x, y))])
    });
    depth
        .save(episode.join(format!("depth{}{}.png", suffix, frame)))
        .unwrap();

    let labels = ImageBuffer::<Luma<u8>, Vec<u8>>::from_fn(w, h, |x, y| {
        Luma([label_value(frame, idx(x, y))])
    });
    labels
        .save(episode.join(format!("labels{}{}.png", suffix, frame)))
        .unwrap();

    let state: Vec<String> = (0..7)
        .map(|row| {
            let values: Vec<String> = (0..7)
                .map(|j| state_value(frame, row, j).to_string())
                .collect();
            format!("{} right_arm", values.join(" "))
        })
        .collect();
    fs::write(episode.join(format!("state{}.txt", frame)), state.join("\n")).unwrap();

    let mut poses = String::new();
    for mesh_id in MESH_IDS {
        let t = part_translation(frame, mesh_id);
        poses.push_str(&format!("{}\n", mesh_id));
        poses.push_str(&format!("{} 1 0 0 {} 0 1 0 {} 0 0 1\n", t[0], t[1], t[2]));
    }
    fs::write(episode.join(format!("se3state{}.txt", frame)), poses).unwrap();
}

/// Writes `flow_<step_id>/flow<suffix><start>.png`, x/y/z stored as b/g/r.
pub fn write_flow(episode: &Path, suffix: &str, step_id: usize, start: usize, res: Resolution) {
    let dir = episode.join(format!("flow_{}", step_id));
    fs::create_dir_all(&dir).unwrap();
    let (w, h) = (res.width as u32, res.height as u32);

    ImageBuffer::<Rgb<u16>, Vec<u16>>::from_fn(w, h, |x, y| {
        let i = (y * w + x) as usize;
        Rgb([
            flow_value(step_id, 2, i),
            flow_value(step_id, 1, i),
            flow_value(step_id, 0, i),
        ])
    })
    .save(dir.join(format!("flow{}{}.png", suffix, start)))
    .unwrap();
}

/// Writes every file a window of `window` steps from `start` reads.
pub fn write_window(
    episode: &Path,
    suffix: &str,
    stride: usize,
    window: usize,
    start: usize,
    res: Resolution,
) {
    for k in 0..=window {
        write_frame(episode, suffix, start + k * stride, res);
    }
    for k in 0..window {
        write_flow(episode, suffix, (k + 1) * stride, start, res);
    }
}
