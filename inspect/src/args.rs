use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "Episode Inspector")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Root directories holding episode folders, separated by ",,".
    #[arg(long)]
    pub data: String,

    /// Suffix of the depth, label and flow image names.
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Raw frames between window positions.
    #[arg(long, default_value_t = 1)]
    pub stride: usize,

    /// Steps per sequence.
    #[arg(long, default_value_t = 1)]
    pub window: usize,

    /// Fraction of each episode used for training.
    #[arg(long, default_value_t = 0.6)]
    pub train_fraction: f64,

    /// Fraction of each episode used for validation.
    #[arg(long, default_value_t = 0.15)]
    pub val_fraction: f64,

    /// Split to inspect: train, val or test.
    #[arg(long, default_value = "train")]
    pub split: String,

    #[arg(long, default_value_t = 240)]
    pub height: usize,

    #[arg(long, default_value_t = 320)]
    pub width: usize,

    /// Factor applied to raw depth and flow samples.
    #[arg(long, default_value_t = 1e-4)]
    pub scale: f32,

    /// Control mode: comvel, actvel, comacc, comboth, actdiffvel or comdiffvel.
    #[arg(long, default_value = "comvel")]
    pub control: String,

    /// Camera calibration file. The identity camera is used if omitted.
    #[arg(long)]
    pub camera: Option<PathBuf>,

    /// Tracked mesh ids, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub mesh_ids: Vec<i32>,

    /// Labels file to take the tracked mesh ids from instead of --mesh-ids.
    #[arg(long)]
    pub labels_file: Option<PathBuf>,

    /// Number of sequences per batch.
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Number of data loader workers.
    #[arg(long, default_value_t = num_cpus::get())]
    pub workers: usize,

    /// Load at most this many samples.
    #[arg(long)]
    pub samples: Option<usize>,

    /// Seed for the sample order.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the file audit.
    #[arg(long)]
    pub no_audit: bool,

    #[arg(long)]
    pub verbose: bool,
}
