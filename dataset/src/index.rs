/// Routes flat sample indices to episodes through a cumulative count table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndex {
    /// `prefix[i]` is the number of samples in episodes `0..i`.
    prefix: Vec<usize>,
}

impl SplitIndex {
    pub fn new(counts: &[usize]) -> Self {
        let mut prefix = Vec::with_capacity(counts.len() + 1);
        prefix.push(0);
        for &count in counts {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + count);
        }
        Self { prefix }
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.prefix[self.prefix.len() - 1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_episodes(&self) -> usize {
        self.prefix.len() - 1
    }

    pub fn prefix(&self) -> &[usize] {
        &self.prefix
    }

    /// Returns `(episode, offset)` for a flat index, where `offset` counts
    /// from the start of the episode's split. The episode is the greatest `i`
    /// with `prefix[i] <= index`, so empty episodes are skipped.
    pub fn locate(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.len() {
            return None;
        }
        let episode = self.prefix.partition_point(|&p| p <= index) - 1;
        Some((episode, index - self.prefix[episode]))
    }
}
