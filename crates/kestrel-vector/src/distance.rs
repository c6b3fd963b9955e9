//! Distance function used for nearest-neighbor ranking.
//!
//! The store ranks by **squared** Euclidean distance: it orders identically to
//! L2 distance, skips the square root, and is what callers get back as the
//! `distance` of a search result (smaller = more similar, 0 = identical).

/// Compute the squared Euclidean (L2²) distance between two vectors.
///
/// Callers must pass vectors of equal length; the store validates dimensions
/// before any distance is computed.
#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = 0.0f32;

    // Manual loop unrolling for better performance
    let chunks = a.len() / 4;
    let remainder = a.len() % 4;

    for i in 0..chunks {
        let base = i * 4;
        let d0 = a[base] - b[base];
        let d1 = a[base + 1] - b[base + 1];
        let d2 = a[base + 2] - b[base + 2];
        let d3 = a[base + 3] - b[base + 3];
        sum += d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3;
    }

    let start = chunks * 4;
    for i in 0..remainder {
        let idx = start + i;
        let d = a[idx] - b[idx];
        sum += d * d;
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let a = vec![1.0, 2.0, 3.0];
        assert_eq!(squared_euclidean(&a, &a), 0.0);
    }

    #[test]
    fn test_unit_offset() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((squared_euclidean(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_is_squared_not_root() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        // L2 would be 5.0
        assert!((squared_euclidean(&a, &b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_unrolled_and_remainder_paths_agree() {
        let a: Vec<f32> = (0..7).map(|i| i as f32).collect();
        let b: Vec<f32> = (0..7).map(|i| (i * 2) as f32).collect();
        let naive: f32 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
        assert!((squared_euclidean(&a, &b) - naive).abs() < 1e-4);
    }
}
