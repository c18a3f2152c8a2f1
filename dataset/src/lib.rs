pub mod catalog;
pub mod config;
pub mod error;
pub mod frames;
pub mod index;
pub mod loader;
pub mod provider;
pub mod sequence;
pub mod tensors;

pub use catalog::{parse_roots, Catalog, EpisodeDescriptor, SplitRange};
pub use config::{CatalogConfig, ControlMode, LoadOptions, Split};
pub use error::{DatasetError, Result};
pub use loader::{shuffled_indices, DataLoader};
pub use provider::{EpisodeLoader, SequenceDataset};
pub use sequence::{Sequence, SequenceAssembler};
pub use tensors::{stack_sequences, SequenceTensors};
