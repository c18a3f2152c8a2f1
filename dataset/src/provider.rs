use std::sync::Arc;

use crate::catalog::{Catalog, EpisodeDescriptor};
use crate::config::{LoadOptions, Split};
use crate::error::{DatasetError, Result};
use crate::index::SplitIndex;
use crate::sequence::{Sequence, SequenceAssembler};

/// Loads one sample given its episode and starting frame.
///
/// Implementations must be reentrant: the same loader is shared by every
/// worker of a [`DataLoader`](crate::loader::DataLoader).
pub trait EpisodeLoader: Send + Sync {
    type Output;

    fn load(&self, episode: &EpisodeDescriptor, start: usize) -> Result<Self::Output>;
}

impl EpisodeLoader for SequenceAssembler {
    type Output = Sequence;

    fn load(&self, episode: &EpisodeDescriptor, start: usize) -> Result<Sequence> {
        SequenceAssembler::load(self, episode, start)
    }
}

impl<T, F> EpisodeLoader for F
where
    F: Fn(&EpisodeDescriptor, usize) -> Result<T> + Send + Sync,
{
    type Output = T;

    fn load(&self, episode: &EpisodeDescriptor, start: usize) -> Result<T> {
        self(episode, start)
    }
}

/// Random access over one split of a catalog.
///
/// Sample `i` is the window starting at frame `split.start + offset` of the
/// episode that owns `i`. Nothing is cached: every access reads from disk.
pub struct SequenceDataset<L = SequenceAssembler> {
    catalog: Arc<Catalog>,
    split: Split,
    index: SplitIndex,
    loader: L,
}

impl SequenceDataset<SequenceAssembler> {
    /// Dataset backed by the sequence assembler.
    pub fn with_options(catalog: Arc<Catalog>, split: Split, options: LoadOptions) -> Result<Self> {
        Self::new(catalog, split, SequenceAssembler::new(options))
    }
}

impl<L: EpisodeLoader> SequenceDataset<L> {
    pub fn new(catalog: Arc<Catalog>, split: Split, loader: L) -> Result<Self> {
        if catalog.is_empty() {
            return Err(DatasetError::EmptyCatalog);
        }

        let index = SplitIndex::new(&catalog.split_sizes(split));
        log::info!(
            "Setting up {} dataset. Total number of samples: {}",
            split,
            index.len()
        );

        Ok(Self {
            catalog,
            split,
            index,
            loader,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Episode owning sample `index` and the frame its window starts at.
    pub fn locate(&self, index: usize) -> Result<(&EpisodeDescriptor, usize)> {
        let (episode, offset) = self
            .index
            .locate(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;

        let descriptor = &self.catalog.episodes()[episode];
        Ok((descriptor, descriptor.split(self.split).start + offset))
    }

    pub fn get(&self, index: usize) -> Result<L::Output> {
        let (episode, start) = self.locate(index)?;
        self.loader.load(episode, start)
    }
}
