use std::path::PathBuf;

use ahash::AHashSet;
use dataset::frames::resolve_window;
use dataset::{EpisodeLoader, SequenceDataset};
use rayon::prelude::*;

use crate::progress::AuditProgressBar;

/// Windows of a split whose files are not all on disk.
#[derive(Debug, Default)]
pub struct AuditReport {
    pub num_windows: usize,
    pub incomplete: Vec<usize>,
    pub out_of_range: Vec<usize>,
    pub missing_files: Vec<PathBuf>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.incomplete.is_empty() && self.out_of_range.is_empty()
    }

    pub fn log(&self) {
        if self.is_clean() {
            log::info!("All {} windows complete", self.num_windows);
            return;
        }

        log::warn!(
            "{} of {} windows have missing files, {} run past their episode",
            self.incomplete.len(),
            self.num_windows,
            self.out_of_range.len()
        );
        for path in &self.missing_files {
            log::debug!("Missing {}", path.display());
        }
    }
}

enum WindowStatus {
    Complete,
    OutOfRange,
    Missing(Vec<PathBuf>),
}

/// Checks every window of the dataset's split for absent files.
pub fn audit<L: EpisodeLoader>(
    dataset: &SequenceDataset<L>,
    progress: Option<&AuditProgressBar>,
) -> AuditReport {
    let statuses: Vec<(usize, WindowStatus)> = (0..dataset.len())
        .into_par_iter()
        .map(|index| {
            let status = check_window(dataset, index);
            if let Some(bar) = progress {
                bar.inc();
            }
            (index, status)
        })
        .collect();

    let mut report = AuditReport {
        num_windows: statuses.len(),
        ..AuditReport::default()
    };
    let mut missing = AHashSet::new();

    for (index, status) in statuses {
        match status {
            WindowStatus::Complete => {}
            WindowStatus::OutOfRange => report.out_of_range.push(index),
            WindowStatus::Missing(paths) => {
                report.incomplete.push(index);
                missing.extend(paths);
            }
        }
    }

    report.missing_files = missing.into_iter().collect();
    report.missing_files.sort();
    report
}

fn check_window<L: EpisodeLoader>(dataset: &SequenceDataset<L>, index: usize) -> WindowStatus {
    let Ok((episode, start)) = dataset.locate(index) else {
        return WindowStatus::OutOfRange;
    };
    if episode.window_end(start) >= episode.num_frames {
        return WindowStatus::OutOfRange;
    }

    let frames = resolve_window(
        &episode.root,
        &episode.suffix,
        episode.stride,
        episode.window,
        start,
    );

    // The last position's flow is never read
    let missing: Vec<PathBuf> = frames
        .iter()
        .enumerate()
        .flat_map(|(k, frame)| frame.missing(k < episode.window))
        .map(PathBuf::from)
        .collect();

    if missing.is_empty() {
        WindowStatus::Complete
    } else {
        WindowStatus::Missing(missing)
    }
}
