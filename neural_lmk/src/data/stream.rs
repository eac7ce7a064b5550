//! Sample streams.
//!
//! A stream is a single cursor over batches. The trainer is its only consumer.

use crate::error::Result;

/// Source of training or validation batches.
pub trait SampleStream {
    /// Batch type.
    type Item;

    /// Samples per batch.
    fn batch_size(&self) -> usize;

    /// Batches in one natural pass.
    fn len(&self) -> usize;

    /// Whether a natural pass yields nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total samples in the dataset, when known.
    fn n_samples(&self) -> Option<usize> {
        None
    }

    /// Move the cursor back to the start of a pass.
    fn rewind(&mut self);

    /// Next batch, `None` at the end of the pass.
    fn next_batch(&mut self) -> Option<Result<Self::Item>>;
}

/// In-memory stream over prepared batches.
#[derive(Debug, Clone)]
pub struct VecStream<T> {
    batches: Vec<T>,
    batch_size: usize,
    n_samples: Option<usize>,
    cursor: usize,
}

impl<T: Clone> VecStream<T> {
    /// Stream over `batches`, each holding `batch_size` samples.
    pub fn new(batches: Vec<T>, batch_size: usize) -> Self {
        Self {
            batches,
            batch_size,
            n_samples: None,
            cursor: 0,
        }
    }

    /// Declare the dataset size used for progress reporting.
    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = Some(n_samples);
        self
    }
}

impl<T: Clone> SampleStream for VecStream<T> {
    type Item = T;

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn len(&self) -> usize {
        self.batches.len()
    }

    fn n_samples(&self) -> Option<usize> {
        self.n_samples
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn next_batch(&mut self) -> Option<Result<T>> {
        let batch = self.batches.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(Ok(batch))
    }
}

/// Endless replay of a finite stream.
///
/// The inner stream is rewound whenever it runs out. [`rewind`](SampleStream::rewind)
/// does nothing, so the cursor carries over from one epoch to the next.
#[derive(Debug, Clone)]
pub struct Cyclic<S> {
    inner: S,
}

impl<S: SampleStream> Cyclic<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Unwrap.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SampleStream> SampleStream for Cyclic<S> {
    type Item = S::Item;

    fn batch_size(&self) -> usize {
        self.inner.batch_size()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn n_samples(&self) -> Option<usize> {
        self.inner.n_samples()
    }

    fn rewind(&mut self) {}

    fn next_batch(&mut self) -> Option<Result<S::Item>> {
        match self.inner.next_batch() {
            Some(batch) => Some(batch),
            None if self.inner.is_empty() => None,
            None => {
                self.inner.rewind();
                self.inner.next_batch()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<S: SampleStream<Item = u32>>(s: &mut S, n: usize) -> Vec<u32> {
        (0..n).filter_map(|_| s.next_batch()).map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_vec_stream_ends() {
        let mut s = VecStream::new(vec![1u32, 2, 3], 4);
        assert_eq!(drain(&mut s, 5), vec![1, 2, 3]);
        s.rewind();
        assert_eq!(drain(&mut s, 1), vec![1]);
    }

    #[test]
    fn test_cyclic_wraps_and_ignores_rewind() {
        let mut s = Cyclic::new(VecStream::new(vec![1u32, 2, 3], 1));
        assert_eq!(drain(&mut s, 4), vec![1, 2, 3, 1]);
        s.rewind();
        assert_eq!(drain(&mut s, 3), vec![2, 3, 1]);
    }

    #[test]
    fn test_cyclic_empty_stays_empty() {
        let mut s = Cyclic::new(VecStream::<u32>::new(vec![], 1));
        assert!(s.next_batch().is_none());
    }
}
