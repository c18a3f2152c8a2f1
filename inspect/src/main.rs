mod args;
mod audit;
mod progress;

use std::error::Error;
use std::sync::Arc;

use args::Args;
use candle_core::Device;
use clap::Parser;
use dataset::{
    parse_roots, shuffled_indices, stack_sequences, Catalog, CatalogConfig, ControlMode,
    DataLoader, DatasetError, LoadOptions, Sequence, SequenceDataset, Split,
};
use log::LevelFilter;
use progress::{AuditProgressBar, LoadProgressBar};
use readers::{read_camera_calibration, read_part_labels, CameraCalibration, Resolution};
use simplelog::{Config, SimpleLogger};

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let roots = parse_roots(&args.data);
    if roots.is_empty() {
        return Err("no data roots given".into());
    }

    let config = CatalogConfig {
        suffix: args.suffix.clone(),
        stride: args.stride,
        window: args.window,
        train_fraction: args.train_fraction,
        val_fraction: args.val_fraction,
    };
    let catalog = Arc::new(Catalog::build(&roots, &config)?);

    let split: Split = args.split.parse()?;
    let options = load_options(&args)?;
    let dataset = Arc::new(SequenceDataset::with_options(catalog, split, options)?);

    if !args.no_audit {
        let bar = AuditProgressBar::new(dataset.len())?;
        let report = audit::audit(dataset.as_ref(), Some(&bar));
        bar.finish();
        report.log();
    }

    let mut indices = shuffled_indices(dataset.len(), args.seed);
    if let Some(limit) = args.samples {
        indices.truncate(limit);
    }

    let device = select_device()?;
    let loader = DataLoader::new(dataset, indices, args.batch_size, args.workers);
    log::info!(
        "Loading {} samples in {} batches with {} workers",
        loader.num_samples(),
        loader.num_batches(),
        args.workers
    );

    let num_samples = loader.num_samples();
    let bar = LoadProgressBar::new(loader.num_batches())?;
    let (mut loaded, mut failed) = (0, 0);
    let mut shapes_logged = false;

    for batch in loader {
        match batch {
            Ok(sequences) => {
                if !shapes_logged {
                    log_batch_shapes(&sequences, &device)?;
                    shapes_logged = true;
                }
                loaded += sequences.len();
            }
            Err(e @ DatasetError::LoaderStopped { .. }) => {
                log::error!("{}", e);
                failed += 1;
            }
            Err(_) => failed += 1,
        }
        bar.update(loaded, failed);
    }
    bar.finish();

    if failed > 0 {
        return Err(format!("{} batches failed to load", failed).into());
    }
    if loaded != num_samples {
        return Err(format!("loaded {} of {} samples", loaded, num_samples).into());
    }

    log::info!("Loaded {} samples", loaded);
    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::init(level, Config::default())?;

    Ok(args)
}

fn load_options(args: &Args) -> Result<LoadOptions, Box<dyn Error>> {
    let control: ControlMode = args.control.parse()?;

    let mesh_ids = match &args.labels_file {
        Some(path) => {
            let labels = read_part_labels(path)?;
            log::info!(
                "Tracking {} parts from {}: {}",
                labels.mesh_ids.len(),
                path.display(),
                labels.frames.join(" ")
            );
            labels.mesh_ids
        }
        None => args.mesh_ids.clone(),
    };

    let camera = match &args.camera {
        Some(path) => read_camera_calibration(path)?,
        None => {
            log::warn!("No camera file given, using the identity modelview");
            CameraCalibration::default()
        }
    };

    Ok(LoadOptions {
        resolution: Resolution::new(args.height, args.width),
        scale: args.scale,
        mesh_ids,
        control,
        camera,
    })
}

fn select_device() -> Result<Device, Box<dyn Error>> {
    #[cfg(feature = "cuda")]
    {
        let device = Device::cuda_if_available(0)?;
        if device.is_cuda() {
            log::info!("Using CUDA");
            return Ok(device);
        }
    }
    #[cfg(feature = "metal")]
    if let Ok(device) = Device::new_metal(0) {
        log::info!("Using Metal");
        return Ok(device);
    }

    log::info!("Using CPU");
    Ok(Device::Cpu)
}

fn log_batch_shapes(sequences: &[Sequence], device: &Device) -> Result<(), Box<dyn Error>> {
    let batch = stack_sequences(sequences, device)?;
    log::info!("depths: {:?}", batch.depths.dims());
    log::info!("labels: {:?}", batch.labels.dims());
    log::info!("flows: {:?}", batch.flows.dims());
    log::info!("configs: {:?}", batch.actual_configs.dims());
    log::info!("controls: {:?}", batch.controls.dims());
    log::info!("poses: {:?}", batch.poses.dims());
    Ok(())
}
