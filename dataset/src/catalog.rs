use std::fs;
use std::path::{Path, PathBuf};

use readers::{read_frame_count, ReadError, STATS_FILE};

use crate::config::{CatalogConfig, Split};
use crate::error::{DatasetError, Result};

/// Separator between root directories in a single root-list string.
pub const ROOT_SEPARATOR: &str = ",,";

/// Contiguous block of frames `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRange {
    pub start: usize,
    pub len: usize,
}

impl SplitRange {
    /// Inclusive last frame, `None` for an empty range.
    pub fn last(&self) -> Option<usize> {
        (self.len > 0).then(|| self.start + self.len - 1)
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, frame: usize) -> bool {
        frame >= self.start && frame < self.end()
    }
}

/// One recorded episode and how its frames are divided between splits.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeDescriptor {
    pub root: PathBuf,
    pub suffix: String,
    pub stride: usize,
    pub window: usize,
    pub num_frames: usize,
    pub train: SplitRange,
    pub val: SplitRange,
    pub test: SplitRange,
}

impl EpisodeDescriptor {
    /// Divides `num_frames` into train, val and test blocks in that order.
    /// Train and val get `floor(fraction * n)` frames, test the remainder.
    pub fn new(root: PathBuf, num_frames: usize, config: &CatalogConfig) -> Self {
        let num_train = (config.train_fraction * num_frames as f64) as usize;
        let num_val = (config.val_fraction * num_frames as f64) as usize;
        let num_test = num_frames.saturating_sub(num_train + num_val);

        Self {
            root,
            suffix: config.suffix.clone(),
            stride: config.stride,
            window: config.window,
            num_frames,
            train: SplitRange {
                start: 0,
                len: num_train,
            },
            val: SplitRange {
                start: num_train,
                len: num_val,
            },
            test: SplitRange {
                start: num_train + num_val,
                len: num_test,
            },
        }
    }

    pub fn split(&self, split: Split) -> SplitRange {
        match split {
            Split::Train => self.train,
            Split::Val => self.val,
            Split::Test => self.test,
        }
    }

    /// Last raw frame read by a window starting at `start`.
    pub fn window_end(&self, start: usize) -> usize {
        start + self.stride * self.window
    }
}

/// All discovered episodes, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    episodes: Vec<EpisodeDescriptor>,
}

impl Catalog {
    /// Scans every root for episode directories and reads their frame counts.
    pub fn build(roots: &[PathBuf], config: &CatalogConfig) -> Result<Self> {
        config.validate()?;

        let mut episodes = Vec::new();
        for root in roots {
            for dir in episode_dirs(root)? {
                let num_frames = read_episode_frames(&dir)?;
                log::info!("Found {} frames in episode {}", num_frames, dir.display());
                episodes.push(EpisodeDescriptor::new(dir, num_frames, config));
            }
        }

        let catalog = Self { episodes };
        catalog.log_stats();
        Ok(catalog)
    }

    pub fn from_episodes(episodes: Vec<EpisodeDescriptor>) -> Self {
        Self { episodes }
    }

    pub fn episodes(&self) -> &[EpisodeDescriptor] {
        &self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Frames per episode assigned to `split`.
    pub fn split_sizes(&self, split: Split) -> Vec<usize> {
        self.episodes.iter().map(|e| e.split(split).len).collect()
    }

    pub fn log_stats(&self) {
        let total: usize = self.episodes.iter().map(|e| e.num_frames).sum();
        log::info!("Episodes: {}", self.episodes.len());
        log::info!("Total frames: {}", total);
        for split in [Split::Train, Split::Val, Split::Test] {
            log::info!(
                "{} frames: {}",
                split,
                self.split_sizes(split).iter().sum::<usize>()
            );
        }
    }
}

/// Splits a `,,` separated root list.
pub fn parse_roots(list: &str) -> Vec<PathBuf> {
    list.split(ROOT_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn episode_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let scan_err = |source| DatasetError::Scan {
        path: root.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    // read_dir order is platform dependent
    dirs.sort();

    Ok(dirs)
}

fn read_episode_frames(dir: &Path) -> Result<usize> {
    let path = dir.join(STATS_FILE);
    read_frame_count(&path).map_err(|e| match e {
        ReadError::MissingFile { path } => DatasetError::MissingMetadata { path },
        other => other.into(),
    })
}
