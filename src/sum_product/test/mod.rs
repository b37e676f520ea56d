//! Kernel-level properties shared by every strategy.

use crate::sum_product::code::*;
use crate::sum_product::data::{approx_eq, magnitude, random_pair, wave_pair};

/// Every public entry point, labelled, for a fixed degree.
fn all_kernels(a: &[f64], b: &[f64], degree: usize) -> Vec<(String, Result<f64, SumProductError>)> {
    let mut out = vec![
        ("scalar".to_string(), scalar_sum(a, b)),
        ("functional".to_string(), functional_sum(a, b)),
        ("unrolled4".to_string(), unrolled4_sum(a, b)),
        (
            "parallel".to_string(),
            partitioned_sum(a, b, degree, ChunkWorker::Scalar),
        ),
    ];
    for width in LaneWidth::ALL {
        out.push((format!("vector{}", width.lanes()), vector_sum(a, b, width)));
        out.push((
            format!("parallel-vector{}", width.lanes()),
            partitioned_vector_sum(a, b, degree, width),
        ));
    }
    out
}

/// Results of the kernels that ran; unsupported vector widths are skipped.
fn supported(results: Vec<(String, Result<f64, SumProductError>)>) -> Vec<(String, f64)> {
    results
        .into_iter()
        .filter_map(|(name, result)| match result {
            Ok(value) => Some((name, value)),
            Err(SumProductError::Unsupported { .. }) => None,
            Err(e) => panic!("{} failed: {}", name, e),
        })
        .collect()
}

#[test]
fn test_basic_all_kernels() {
    let a = [1.0, 2.0, 3.0, 4.0];
    let b = [5.0, 6.0, 7.0, 8.0];
    // 1*5 + 2*6 + 3*7 + 4*8 = 5 + 12 + 21 + 32 = 70
    for degree in 1..=6 {
        for (name, value) in supported(all_kernels(&a, &b, degree)) {
            assert_eq!(value, 70.0, "{} with degree {}", name, degree);
        }
    }
}

#[test]
fn test_empty_all_kernels() {
    let a: [f64; 0] = [];
    let b: [f64; 0] = [];
    for (name, value) in supported(all_kernels(&a, &b, 3)) {
        assert_eq!(value, 0.0, "{}", name);
    }
}

#[test]
fn test_single_element() {
    for (name, value) in supported(all_kernels(&[3.0], &[4.0], 2)) {
        assert_eq!(value, 12.0, "{}", name);
    }
}

#[test]
fn test_vector_tail_included() {
    // n = 7: one full 4-lane step and a 3-element tail (or three 2-lane steps
    // and a 1-element tail)
    let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    let b = [1.0; 7];
    for width in LaneWidth::ALL {
        match vector_sum(&a, &b, width) {
            Ok(value) => assert_eq!(value, 28.0, "width {}", width.lanes()),
            Err(e) => assert!(matches!(e, SumProductError::Unsupported { .. })),
        }
    }
    assert_eq!(unrolled4_sum(&a, &b), Ok(28.0));
}

#[test]
fn test_vector_tail_every_remainder() {
    for n in 0..=17 {
        let a: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        let b = vec![2.0; n];
        let expected = (n * (n + 1)) as f64;
        for (name, value) in supported(all_kernels(&a, &b, 3)) {
            assert_eq!(value, expected, "{} at n={}", name, n);
        }
    }
}

#[test]
fn test_alternating_degree_two() {
    let a = [1.0, -1.0, 1.0, -1.0, 1.0];
    let b = [1.0; 5];

    let partials = reduce_chunks(&a, &b, 2, |x, y| scalar_sum(x, y).unwrap()).unwrap();
    assert_eq!(partials, vec![0.0, 1.0]);
    assert_eq!(combine(&partials), 1.0);
    assert_eq!(partitioned_sum(&a, &b, 2, ChunkWorker::Scalar), Ok(1.0));
}

#[test]
fn test_partition_uneven_degree() {
    // n = 10, degree = 4: chunks of 2, 3, 2, 3
    let (a, b) = random_pair(10, 11);
    let expected = scalar_sum(&a, &b).unwrap();
    let got = partitioned_sum(&a, &b, 4, ChunkWorker::Scalar).unwrap();
    assert!(approx_eq(got, expected, magnitude(&a, &b)));

    let sizes: Vec<usize> = chunks(10, 4).unwrap().iter().map(Chunk::len).collect();
    assert_eq!(sizes, vec![2, 3, 2, 3]);
}

#[test]
fn test_degree_exceeds_length() {
    let a = [1.0, 2.0, 3.0];
    let b = [1.0, 1.0, 1.0];
    for (name, value) in supported(all_kernels(&a, &b, 16)) {
        assert_eq!(value, 6.0, "{}", name);
    }
}

#[test]
fn test_all_kernels_agree_random() {
    for &n in &[1usize, 2, 3, 5, 8, 31, 64, 257, 1000, 4099] {
        let (a, b) = random_pair(n, n as u64);
        let scale = magnitude(&a, &b);
        let expected = scalar_sum(&a, &b).unwrap();
        for degree in [1, 2, 3, 4, 7] {
            for (name, value) in supported(all_kernels(&a, &b, degree)) {
                assert!(
                    approx_eq(value, expected, scale),
                    "{} n={} degree={}: expected {}, got {}",
                    name,
                    n,
                    degree,
                    expected,
                    value
                );
            }
        }
    }
}

#[test]
fn test_all_kernels_agree_wave() {
    let (a, b) = wave_pair(100_003);
    let scale = magnitude(&a, &b);
    let expected = scalar_sum(&a, &b).unwrap();
    for (name, value) in supported(all_kernels(&a, &b, 4)) {
        assert!(approx_eq(value, expected, scale), "{}: {} vs {}", name, value, expected);
    }
}

#[test]
fn test_repeated_calls_identical() {
    let (a, b) = wave_pair(4097);
    let first = supported(all_kernels(&a, &b, 4));
    let second = supported(all_kernels(&a, &b, 4));
    assert_eq!(first, second);
}

#[test]
fn test_scalar_range() {
    let a = [1.0, 2.0, 3.0, 4.0];
    let b = [5.0, 6.0, 7.0, 8.0];
    assert_eq!(scalar_sum_range(&a, &b, 1, 3), Ok(33.0));
    assert_eq!(scalar_sum_range(&a, &b, 2, 2), Ok(0.0));
    assert_eq!(scalar_sum_range(&a, &b, 0, 4), scalar_sum(&a, &b));
    assert_eq!(
        scalar_sum_range(&a, &b, 3, 2),
        Err(SumProductError::InvalidRange { start: 3, end: 2, len: 4 })
    );
    assert_eq!(
        scalar_sum_range(&a, &b, 0, 5),
        Err(SumProductError::InvalidRange { start: 0, end: 5, len: 4 })
    );
}

#[test]
fn test_length_mismatch_everywhere() {
    let a = [1.0, 2.0, 3.0];
    let b = [1.0, 2.0];
    let mismatch = SumProductError::LengthMismatch { left: 3, right: 2 };
    for (name, result) in all_kernels(&a, &b, 2) {
        assert_eq!(result, Err(mismatch.clone()), "{}", name);
    }
    assert_eq!(scalar_sum_range(&a, &b, 0, 1), Err(mismatch));
}

#[test]
fn test_invalid_degree() {
    let a = [1.0, 2.0];
    assert_eq!(
        partitioned_sum(&a, &a, 0, ChunkWorker::Scalar),
        Err(SumProductError::InvalidDegree(0))
    );
    for width in LaneWidth::ALL {
        match partitioned_vector_sum(&a, &a, 0, width) {
            Err(SumProductError::InvalidDegree(0)) | Err(SumProductError::Unsupported { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn test_functional_close_to_scalar() {
    let (a, b) = wave_pair(1_000);
    let scalar = scalar_sum(&a, &b).unwrap();
    let functional = functional_sum(&a, &b).unwrap();
    assert!(approx_eq(functional, scalar, magnitude(&a, &b)));
}

#[test]
fn test_available_variants_all_run() {
    let (a, b) = wave_pair(999);
    let variants = available_variants(3);
    assert_eq!(variants[0].name, BASELINE);
    for v in &variants {
        assert!((v.function)(&a, &b).is_ok(), "{}", v.name);
    }
}
