//! Behavioral properties shared by the filter family.

use std::sync::Arc;

use approx::assert_relative_eq;
use spotfield_algorithms::prelude::*;

/// Deterministic scattered points in [0, 10)^2
fn scattered(n: usize, seed: u64) -> PointSet<f64> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    let mut points = PointSet::with_capacity(2, n).unwrap();
    for i in 0..n {
        points.push(&[10.0 * next(), 10.0 * next()], i as f64).unwrap();
    }
    points
}

fn factory(filter_type: FilterType, radius: f64) -> FilterFactory<f64> {
    let mut factory = FilterFactory::new(filter_type, f64::NAN);
    factory.set_radius(radius).unwrap();
    factory
}

#[test]
fn locality_far_queries_are_out_of_bounds() {
    let tree = Arc::new(KdTree::build(scattered(200, 7)));
    let radius = 1.5;

    for ty in [
        FilterType::Nearest,
        FilterType::Mean,
        FilterType::Median,
        FilterType::Gaussian,
        FilterType::Density,
        FilterType::SingleSpotRemoval,
    ] {
        let mut filter = factory(ty, radius).create_filter(&tree).unwrap();
        for q in [[-1.6, 5.0], [11.6, 5.0], [5.0, -2.0], [30.0, 30.0]] {
            let value = filter.filter(&q).unwrap();
            assert!(value.is_nan(), "{ty:?} at {q:?} gave {value}");
        }
    }
}

#[test]
fn radius_saturation_invariance() {
    let tree = Arc::new(KdTree::build(scattered(60, 11)));
    let query = [4.2, 6.1];
    // Largest distance from the query to any sample is below 15
    let radii = [15.0, 150.0, 1.5e3, 1.5e5, 1.5e8];

    for ty in [
        FilterType::Mean,
        FilterType::Median,
        FilterType::Density,
        FilterType::Gaussian,
    ] {
        let full = factory(ty, 15.0)
            .create_filter(&tree)
            .unwrap()
            .filter(&query)
            .unwrap();
        for radius in radii {
            let value = factory(ty, radius)
                .create_filter(&tree)
                .unwrap()
                .filter(&query)
                .unwrap();
            assert_eq!(value, full, "{ty:?} changed at radius {radius}");
        }
    }
}

#[test]
fn median_single_and_even_neighborhoods() {
    let points =
        PointSet::from_parts(1, vec![0.0, 10.0, 11.0, 12.0, 13.0], vec![5.0, 1.0, 9.0, 4.0, 2.0])
            .unwrap();
    let tree = Arc::new(KdTree::build(points));
    let mut median = factory(FilterType::Median, 0.5).create_filter(&tree).unwrap();

    // Only the sample at 0 is in range
    assert_eq!(median.filter(&[0.2]).unwrap(), 5.0);

    // Four samples {1, 9, 4, 2}: mean of the central pair 2 and 4
    let mut median = factory(FilterType::Median, 2.0).create_filter(&tree).unwrap();
    assert_relative_eq!(median.filter(&[11.5]).unwrap(), 3.0);
}

#[test]
fn single_spot_removal_needs_company() {
    let points = PointSet::from_parts(2, vec![0.0, 0.0, 0.5, 0.0, 5.0, 5.0], vec![1.0, 2.0, 3.0])
        .unwrap();
    let tree = Arc::new(KdTree::build(points));
    let mut filter = factory(FilterType::SingleSpotRemoval, 1.0)
        .create_filter(&tree)
        .unwrap();

    assert_eq!(filter.filter(&[0.0, 0.0]).unwrap(), 1.0);
    assert_eq!(filter.filter(&[0.5, 0.0]).unwrap(), 2.0);
    assert!(filter.filter(&[5.0, 5.0]).unwrap().is_nan());
}

#[test]
fn index_round_trip_recovers_samples() {
    let points = scattered(500, 3);
    let tree = KdTree::build(points.clone());

    let mut expected: Vec<(Vec<f64>, f64)> =
        points.iter().map(|(p, v)| (p.to_vec(), v)).collect();
    let mut actual: Vec<(Vec<f64>, f64)> = tree
        .samples()
        .into_iter()
        .map(|s| (s.position, s.value))
        .collect();

    let key = |a: &(Vec<f64>, f64), b: &(Vec<f64>, f64)| a.1.total_cmp(&b.1);
    expected.sort_by(key);
    actual.sort_by(key);
    assert_eq!(actual, expected);
}

#[test]
fn five_point_mean() {
    let points = PointSet::from_parts(
        2,
        vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.5, 1.0, 1.0, 0.0, 1.0],
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
    )
    .unwrap();
    let mut mean = factory(FilterType::Mean, 0.6)
        .create_filter_for(points)
        .unwrap();
    assert_relative_eq!(mean.filter(&[1.0, 0.5]).unwrap(), 2.0);
}

#[test]
fn dimension_mismatch_fails_fast() {
    let tree = Arc::new(KdTree::build(scattered(10, 1)));
    let mut filter = factory(FilterType::Mean, 1.0).create_filter(&tree).unwrap();
    assert!(matches!(
        filter.filter(&[1.0]),
        Err(Error::DimensionMismatch { expected: 2, actual: 1 })
    ));
}
