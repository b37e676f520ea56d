//! Chunked fan-out/fan-in over a fixed number of workers.
//!
//! `[0, n)` is cut into exactly `degree` contiguous chunks. Every chunk runs as
//! its own task on the rayon pool and writes only its own slot of the partial
//! result array, so no locking is involved. The calling thread blocks until
//! every slot is filled, then [`combine`] adds them in chunk order.

use std::ops::Range;

use rayon::prelude::*;

use super::combine::combine;
use super::error::{check_lengths, SumProductError};
use super::scalar::accumulate;
use super::vector::{LaneWidth, VectorKernel};

/// Half-open sub-range `start..end` of the index space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    /// Bounds of chunk `index` out of `degree` over `n` elements.
    ///
    /// Integer-truncating boundaries, so larger chunks sit towards the end.
    pub fn nth(index: usize, n: usize, degree: usize) -> Self {
        let bound = |k: usize| (k as u128 * n as u128 / degree as u128) as usize;
        Self {
            start: bound(index),
            end: bound(index + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// All `degree` chunks tiling `[0, n)`.
///
/// # Errors
/// Returns [`SumProductError::InvalidDegree`] if `degree` is zero.
pub fn chunks(n: usize, degree: usize) -> Result<Vec<Chunk>, SumProductError> {
    if degree == 0 {
        return Err(SumProductError::InvalidDegree(degree));
    }
    Ok((0..degree).map(|k| Chunk::nth(k, n, degree)).collect())
}

/// Per-chunk body of a partitioned reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkWorker {
    /// Sequential scalar accumulation.
    Scalar,
    /// Vector kernel of the given width, scalar tail included per chunk.
    Vector(LaneWidth),
}

/// Run `worker` on every chunk in parallel and return the partial results,
/// indexed by chunk number.
///
/// # Errors
/// [`SumProductError::LengthMismatch`] or [`SumProductError::InvalidDegree`],
/// both detected before any task is spawned.
pub fn reduce_chunks<F>(
    a: &[f64],
    b: &[f64],
    degree: usize,
    worker: F,
) -> Result<Vec<f64>, SumProductError>
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    check_lengths(a, b)?;
    let chunks = chunks(a.len(), degree)?;

    let mut partials = vec![0.0; degree];
    partials
        .par_iter_mut()
        .zip(chunks.par_iter())
        .with_max_len(1)
        .for_each(|(slot, chunk)| {
            *slot = worker(&a[chunk.range()], &b[chunk.range()]);
        });

    Ok(partials)
}

/// Sum of products split over `degree` workers.
///
/// # Errors
/// [`SumProductError::LengthMismatch`], [`SumProductError::InvalidDegree`],
/// or [`SumProductError::Unsupported`] for a vector worker whose instruction
/// set is missing. All are raised before dispatch.
pub fn partitioned_sum(
    a: &[f64],
    b: &[f64],
    degree: usize,
    worker: ChunkWorker,
) -> Result<f64, SumProductError> {
    check_lengths(a, b)?;
    if degree == 0 {
        return Err(SumProductError::InvalidDegree(degree));
    }

    let partials = match worker {
        ChunkWorker::Scalar => reduce_chunks(a, b, degree, accumulate)?,
        ChunkWorker::Vector(width) => {
            let kernel = VectorKernel::detect(width)?;
            reduce_chunks(a, b, degree, |x, y| kernel.reduce(x, y))?
        }
    };
    Ok(combine(&partials))
}

/// Hybrid variant: every chunk is reduced by the `width`-lane vector kernel.
///
/// # Errors
/// See [`partitioned_sum`].
pub fn partitioned_vector_sum(
    a: &[f64],
    b: &[f64],
    degree: usize,
    width: LaneWidth,
) -> Result<f64, SumProductError> {
    partitioned_sum(a, b, degree, ChunkWorker::Vector(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(n: usize, degree: usize) {
        let chunks = chunks(n, degree).unwrap();
        assert_eq!(chunks.len(), degree);
        assert_eq!(chunks[0].start, 0, "n={} degree={}", n, degree);
        assert_eq!(chunks[degree - 1].end, n, "n={} degree={}", n, degree);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "n={} degree={}", n, degree);
        }
        assert_eq!(chunks.iter().map(Chunk::len).sum::<usize>(), n);
    }

    #[test]
    fn test_chunks_tile_range() {
        for n in 0..40 {
            for degree in 1..12 {
                assert_tiles(n, degree);
            }
        }
        assert_tiles(1_000_000, 7);
        assert_tiles(usize::MAX, 3);
    }

    #[test]
    fn test_chunks_truncating_bounds() {
        let got: Vec<_> = chunks(10, 4).unwrap().iter().map(Chunk::range).collect();
        assert_eq!(got, vec![0..2, 2..5, 5..7, 7..10]);
    }

    #[test]
    fn test_chunks_more_workers_than_elements() {
        let chunks = chunks(2, 5).unwrap();
        assert_eq!(chunks.iter().filter(|c| c.is_empty()).count(), 3);
        assert_tiles(2, 5);
    }

    #[test]
    fn test_chunks_zero_degree() {
        assert_eq!(chunks(10, 0), Err(SumProductError::InvalidDegree(0)));
    }

    #[test]
    fn test_reduce_chunks_partials_by_index() {
        let a = [1.0, -1.0, 1.0, -1.0, 1.0];
        let b = [1.0; 5];
        // chunks [0, 2) and [2, 5)
        let partials = reduce_chunks(&a, &b, 2, accumulate).unwrap();
        assert_eq!(partials, vec![0.0, 1.0]);
        assert_eq!(combine(&partials), 1.0);
    }

    #[test]
    fn test_reduce_chunks_worker_sees_its_chunk() {
        let a: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let b = vec![1.0; 100];
        let lengths = reduce_chunks(&a, &b, 8, |x, _| x.len() as f64).unwrap();
        let expected: Vec<f64> = chunks(100, 8)
            .unwrap()
            .iter()
            .map(|c| c.len() as f64)
            .collect();
        assert_eq!(lengths, expected);
    }

    #[test]
    fn test_partitioned_sum_errors() {
        assert_eq!(
            partitioned_sum(&[1.0], &[1.0], 0, ChunkWorker::Scalar),
            Err(SumProductError::InvalidDegree(0))
        );
        assert_eq!(
            partitioned_sum(&[1.0, 2.0], &[1.0], 2, ChunkWorker::Scalar),
            Err(SumProductError::LengthMismatch { left: 2, right: 1 })
        );
    }
}
