mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::*;
use dataset::sequence::step_duration;
use dataset::{
    Catalog, CatalogConfig, ControlMode, DatasetError, EpisodeDescriptor, LoadOptions,
    SequenceAssembler, SequenceDataset, Split,
};
use readers::{CameraCalibration, ReadError, Resolution, Transform, DEFAULT_SCALE};
use tempfile::TempDir;

const RES: Resolution = Resolution {
    height: 3,
    width: 4,
};

fn options(control: ControlMode) -> LoadOptions {
    LoadOptions {
        resolution: RES,
        scale: DEFAULT_SCALE,
        mesh_ids: MESH_IDS.to_vec(),
        control,
        camera: CameraCalibration::default(),
    }
}

fn episode(root: &Path, num_frames: usize, stride: usize, window: usize) -> EpisodeDescriptor {
    let config = CatalogConfig {
        stride,
        window,
        ..CatalogConfig::default()
    };
    EpisodeDescriptor::new(root.to_path_buf(), num_frames, &config)
}

#[test]
fn test_reference_episode_end_to_end() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    write_stats(&ep, 100);
    write_window(&ep, "", 2, 3, 0, RES);

    let config = CatalogConfig {
        stride: 2,
        window: 3,
        train_fraction: 0.6,
        val_fraction: 0.15,
        ..CatalogConfig::default()
    };
    let catalog = Arc::new(Catalog::build(&[root.path().to_path_buf()], &config).unwrap());
    assert_eq!(catalog.len(), 1);

    let descriptor = &catalog.episodes()[0];
    assert_eq!((descriptor.train.start, descriptor.train.last()), (0, Some(59)));
    assert_eq!((descriptor.val.start, descriptor.val.last()), (60, Some(74)));
    assert_eq!((descriptor.test.start, descriptor.test.last()), (75, Some(99)));

    let dataset = SequenceDataset::with_options(
        catalog.clone(),
        Split::Train,
        options(ControlMode::CommandedVelocity),
    )
    .unwrap();
    assert_eq!(dataset.len(), 60);

    let (_, start) = dataset.locate(0).unwrap();
    assert_eq!(start, 0);

    let seq = dataset.get(0).unwrap();
    let frames = [0, 2, 4, 6];

    for (k, &frame) in frames.iter().enumerate() {
        let depth = seq.depth(k);
        for (i, &v) in depth.iter().enumerate() {
            assert_eq!(v, depth_value(frame, i) as f32 * DEFAULT_SCALE);
        }
        for (i, &v) in seq.label(k).iter().enumerate() {
            assert_eq!(v, label_value(frame, i));
        }
        for j in 0..7 {
            assert_eq!(seq.actual_config(k)[j], state_value(frame, 0, j));
            assert_eq!(seq.commanded_config(k)[j], state_value(frame, 3, j));
        }
    }

    for k in 0..3 {
        // Commanded velocity is the fifth state row.
        for j in 0..7 {
            assert_eq!(seq.control(k)[j], state_value(frames[k], 4, j));
        }

        // Flow of step k comes from flow_<2(k+1)>, in x/y/z plane order.
        let flow = seq.flow(k);
        let pixels = RES.pixels();
        for c in 0..3 {
            assert_eq!(
                flow[c * pixels],
                flow_value(2 * (k + 1), c, 0) as f32 * DEFAULT_SCALE
            );
        }
    }
}

#[test]
fn test_output_shapes() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");

    for window in [1, 2, 4] {
        write_window(&ep, "", 1, window, 0, RES);
        let descriptor = episode(&ep, 20, 1, window);

        for meshes in [0, 1, 2] {
            let mut opts = options(ControlMode::CommandedBoth);
            opts.mesh_ids.truncate(meshes);
            let seq = SequenceAssembler::new(opts).load(&descriptor, 0).unwrap();

            assert_eq!(seq.depths_shape(), [window + 1, 1, 3, 4]);
            assert_eq!(seq.flows_shape(), [window, 3, 3, 4]);
            assert_eq!(seq.configs_shape(), [window + 1, 7]);
            assert_eq!(seq.controls_shape(), [window, 14]);
            assert_eq!(seq.poses_shape(), [window + 1, meshes + 1, 3, 4]);
            assert_eq!(seq.poses.len(), (window + 1) * (meshes + 1) * 12);
        }
    }
}

#[test]
fn test_poses_seen_through_modelview() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    write_window(&ep, "", 1, 1, 4, RES);

    let model_view = Transform::from_parts(
        [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        [0.0, 0.0, 2.0],
    );
    let mut opts = options(ControlMode::CommandedVelocity);
    opts.camera.model_view = model_view;

    let seq = SequenceAssembler::new(opts)
        .load(&episode(&ep, 10, 1, 1), 4)
        .unwrap();

    for k in 0..2 {
        let background: [f32; 12] = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        assert_eq!(seq.pose(k, 0), background.as_slice());

        for (j, &mesh_id) in MESH_IDS.iter().enumerate() {
            let part = Transform::from_parts(
                [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
                part_translation(4 + k, mesh_id),
            );
            let expected: Vec<f32> = (model_view * part).top_rows().concat();
            assert_eq!(seq.pose(k, j + 1), expected.as_slice());
        }
    }
}

#[test]
fn test_finite_difference_controls() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    let (stride, window) = (3, 2);
    write_window(&ep, "", stride, window, 1, RES);
    let descriptor = episode(&ep, 30, stride, window);
    let dt = step_duration(stride);

    for (mode, row) in [
        (ControlMode::ActualDiffVelocity, 0),
        (ControlMode::CommandedDiffVelocity, 3),
    ] {
        let seq = SequenceAssembler::new(options(mode))
            .load(&descriptor, 1)
            .unwrap();
        assert_eq!(seq.controls_shape(), [2, 7]);

        for k in 0..window {
            let (prev, next) = (1 + k * stride, 1 + (k + 1) * stride);
            for j in 0..7 {
                let expected = (state_value(next, row, j) - state_value(prev, row, j)) / dt;
                assert_eq!(seq.control(k)[j], expected);
            }
        }
    }
}

#[test]
fn test_combined_controls() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    write_window(&ep, "_r", 1, 2, 0, RES);
    let mut descriptor = episode(&ep, 10, 1, 2);
    descriptor.suffix = "_r".to_string();

    let seq = SequenceAssembler::new(options(ControlMode::CommandedBoth))
        .load(&descriptor, 0)
        .unwrap();

    for k in 0..2 {
        let control = seq.control(k);
        for j in 0..7 {
            assert_eq!(control[j], state_value(k, 4, j));
            assert_eq!(control[7 + j], state_value(k, 5, j));
        }
    }
}

#[test]
fn test_single_row_controls() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    let (stride, window, start) = (3, 2, 2);
    write_window(&ep, "", stride, window, start, RES);
    let descriptor = episode(&ep, 20, stride, window);

    // Actual velocity is the second state row, commanded acceleration the sixth.
    for (mode, row) in [
        (ControlMode::ActualVelocity, 1),
        (ControlMode::CommandedAcceleration, 5),
        (ControlMode::CommandedVelocity, 4),
    ] {
        let seq = SequenceAssembler::new(options(mode))
            .load(&descriptor, start)
            .unwrap();
        assert_eq!(seq.controls_shape(), [window, 7]);

        for k in 0..window {
            let frame = start + k * stride;
            for j in 0..7 {
                assert_eq!(seq.control(k)[j], state_value(frame, row, j));
            }
        }
    }
}

#[test]
fn test_missing_frame_fails_whole_window() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    write_window(&ep, "", 1, 3, 0, RES);
    fs::remove_file(ep.join("depth2.png")).unwrap();

    let err = SequenceAssembler::new(options(ControlMode::ActualVelocity))
        .load(&episode(&ep, 10, 1, 3), 0)
        .unwrap_err();
    match err {
        DatasetError::Read(ReadError::MissingFile { path }) => {
            assert!(path.ends_with("depth2.png"))
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_flow_fails() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    write_window(&ep, "", 2, 2, 0, RES);
    fs::remove_dir_all(ep.join("flow_4")).unwrap();

    let err = SequenceAssembler::new(options(ControlMode::ActualVelocity))
        .load(&episode(&ep, 10, 2, 2), 0)
        .unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Read(ReadError::MissingFile { .. })
    ));
}

#[test]
fn test_untracked_mesh_fails() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    write_window(&ep, "", 1, 1, 0, RES);

    let mut opts = options(ControlMode::CommandedVelocity);
    opts.mesh_ids.push(42);
    let err = SequenceAssembler::new(opts)
        .load(&episode(&ep, 10, 1, 1), 0)
        .unwrap_err();
    assert!(matches!(err, DatasetError::MissingMesh { mesh_id: 42, .. }));
}

#[test]
fn test_window_past_episode_end_fails() {
    let root = TempDir::new().unwrap();
    let ep = root.path().join("ep0");
    write_window(&ep, "", 2, 2, 6, RES);

    // Frames 6, 8, 10 need at least 11 frames.
    let assembler = SequenceAssembler::new(options(ControlMode::CommandedVelocity));
    assert!(assembler.load(&episode(&ep, 11, 2, 2), 6).is_ok());
    assert!(matches!(
        assembler.load(&episode(&ep, 10, 2, 2), 6),
        Err(DatasetError::WindowOutOfRange {
            end: 10,
            last: 9,
            ..
        })
    ));
}
