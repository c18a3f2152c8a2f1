use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{DatasetError, Result};
use crate::provider::{EpisodeLoader, SequenceDataset};

// Holds x items in the channel per worker
const CHANNEL_BUFFER_MULTIPLIER: usize = 2;

type Batch<T> = Result<Vec<T>>;

/// Multi-threaded loader that reads dataset samples from disk on demand.
///
/// Workers pull chunks of sample indices from a shared queue, load every
/// sample of the chunk and send the batch back. A batch containing a sample
/// that fails to load is returned as that sample's error. If the workers
/// stop before every batch is delivered, a final `LoaderStopped` error is
/// yielded. Batches arrive in completion order, not index order.
pub struct DataLoader<T> {
    receiver: Option<mpsc::Receiver<Batch<T>>>,
    workers: Vec<thread::JoinHandle<()>>,
    num_samples: usize,
    num_batches: usize,
    received: usize,
}

impl<T: Send + 'static> DataLoader<T> {
    pub fn new<L>(
        dataset: Arc<SequenceDataset<L>>,
        indices: Vec<usize>,
        batch_size: usize,
        num_workers: usize,
    ) -> Self
    where
        L: EpisodeLoader<Output = T> + 'static,
    {
        let batch_size = batch_size.max(1);
        let num_workers = num_workers.max(1);
        let num_samples = indices.len();
        let num_batches = num_samples.div_ceil(batch_size);

        let (sender, receiver) = mpsc::sync_channel(num_workers * CHANNEL_BUFFER_MULTIPLIER);
        let (work_sender, work_receiver) =
            mpsc::sync_channel::<Vec<usize>>(num_workers * CHANNEL_BUFFER_MULTIPLIER);
        let work_receiver = Arc::new(Mutex::new(work_receiver));

        let mut workers = Self::spawn_workers(num_workers, work_receiver, sender, dataset);

        // Distribute batches to workers
        workers.push(thread::spawn(move || {
            for chunk in indices.chunks(batch_size) {
                if work_sender.send(chunk.to_vec()).is_err() {
                    break;
                }
            }
        }));

        Self {
            receiver: Some(receiver),
            workers,
            num_samples,
            num_batches,
            received: 0,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_batches(&self) -> usize {
        self.num_batches
    }

    fn spawn_workers<L>(
        num_workers: usize,
        work_receiver: Arc<Mutex<mpsc::Receiver<Vec<usize>>>>,
        sender: mpsc::SyncSender<Batch<T>>,
        dataset: Arc<SequenceDataset<L>>,
    ) -> Vec<thread::JoinHandle<()>>
    where
        L: EpisodeLoader<Output = T> + 'static,
    {
        (0..num_workers)
            .map(|_| {
                let rx = Arc::clone(&work_receiver);
                let tx = sender.clone();
                let dataset = Arc::clone(&dataset);

                thread::spawn(move || loop {
                    let chunk = {
                        let Ok(rx) = rx.lock() else { break };
                        match rx.recv() {
                            Ok(chunk) => chunk,
                            Err(_) => break,
                        }
                    };

                    let batch = Self::load_batch(&dataset, &chunk);
                    if tx.send(batch).is_err() {
                        break;
                    }
                })
            })
            .collect()
    }

    fn load_batch<L>(dataset: &SequenceDataset<L>, chunk: &[usize]) -> Batch<T>
    where
        L: EpisodeLoader<Output = T>,
    {
        let mut samples = Vec::with_capacity(chunk.len());
        for &index in chunk {
            match dataset.get(index) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    log::warn!("Failed to load {} sample {}: {}", dataset.split(), index, e);
                    return Err(e);
                }
            }
        }
        Ok(samples)
    }
}

impl<T> Iterator for DataLoader<T> {
    type Item = Batch<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.received >= self.num_batches {
            return None;
        }

        match self.receiver.as_ref()?.recv() {
            Ok(batch) => {
                self.received += 1;
                Some(batch)
            }
            // Every worker is gone with batches still owed
            Err(_) => {
                let received = self.received;
                self.received = self.num_batches;
                Some(Err(DatasetError::LoaderStopped {
                    expected: self.num_batches,
                    received,
                }))
            }
        }
    }
}

impl<T> Drop for DataLoader<T> {
    fn drop(&mut self) {
        // Unblock workers waiting on a full channel before joining them
        self.receiver.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::warn!("Data loader worker panicked");
            }
        }
    }
}

/// Indices `0..len`, shuffled. A seed makes the order reproducible.
pub fn shuffled_indices(len: usize, seed: Option<u64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    match seed {
        Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => indices.shuffle(&mut rand::thread_rng()),
    }
    indices
}
