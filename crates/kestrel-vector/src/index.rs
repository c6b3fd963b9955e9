//! Exact (flat) nearest-neighbor index.
//!
//! Vectors are kept in one contiguous row-major buffer and every search scans
//! all of them. At the scale this store targets an exact scan is both fast
//! enough and reproducible: reloading the same vectors yields the same
//! distances bit for bit.

use crate::distance::squared_euclidean;
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Flat vector index over row-major `f32` storage.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    /// Vector dimensions.
    dimensions: usize,
    /// `len * dimensions` floats, record `i` at `i * dimensions`.
    data: Vec<f32>,
}

/// A scored position produced by [`FlatIndex::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion position of the vector.
    pub position: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f32,
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    // Worst first: larger distance, then later insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.position.cmp(&other.position))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FlatIndex {
    /// Create an empty index.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::InvalidArgument("Dimensions must be > 0".to_string()));
        }
        Ok(Self {
            dimensions,
            data: Vec::new(),
        })
    }

    /// Rebuild an index from a flat buffer previously obtained via [`as_slice`](Self::as_slice).
    pub fn from_flat(dimensions: usize, data: Vec<f32>) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::InvalidArgument("Dimensions must be > 0".to_string()));
        }
        if data.len() % dimensions != 0 {
            return Err(Error::CorruptState(format!(
                "Vector buffer of {} floats is not a multiple of {} dimensions",
                data.len(),
                dimensions
            )));
        }
        Ok(Self { dimensions, data })
    }

    /// Get the vector dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the number of vectors in the index.
    pub fn len(&self) -> usize {
        self.data.len() / self.dimensions
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get the vector stored at `position`.
    pub fn get(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimensions)?;
        let end = start.checked_add(self.dimensions)?;
        self.data.get(start..end)
    }

    /// Check that `vector` can be stored in or queried against this index.
    pub fn validate(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidArgument(
                "Vector contains NaN or Inf".to_string(),
            ));
        }
        Ok(())
    }

    /// Append vectors. Either all are appended or, on the first invalid
    /// vector, none are.
    pub fn extend<V: AsRef<[f32]>>(&mut self, vectors: &[V]) -> Result<()> {
        for vector in vectors {
            self.validate(vector.as_ref())?;
        }
        self.data.reserve(vectors.len() * self.dimensions);
        for vector in vectors {
            self.data.extend_from_slice(vector.as_ref());
        }
        Ok(())
    }

    /// Drop every vector at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len * self.dimensions);
    }

    /// Find the `k` nearest vectors to `query`, best first.
    ///
    /// Ties are broken by insertion order, so results are stable across
    /// reloads.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.validate(query)?;
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        // Bounded max-heap: the root is the worst of the current best k.
        let mut heap = BinaryHeap::with_capacity(k.min(self.len()) + 1);
        for (position, vector) in self.data.chunks_exact(self.dimensions).enumerate() {
            let candidate = Neighbor {
                position,
                distance: squared_euclidean(query, vector),
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if let Some(worst) = heap.peek() {
                if candidate < *worst {
                    heap.pop();
                    heap.push(candidate);
                }
            }
        }

        Ok(heap.into_sorted_vec())
    }

    /// Approximate heap memory held by the vectors.
    pub fn memory_usage(&self) -> usize {
        self.data.capacity() * std::mem::size_of::<f32>()
    }
}
