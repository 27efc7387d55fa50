use ritk_augment::{
    enumerate_augmented_samples, random_sampling, AugmentError, AugmentationFamily, ParameterRange, ParameterSpace,
};
use ritk_core::spatial::Point;
use ritk_core::transform::CompositeTransform;

fn five_by_three() -> ParameterSpace {
    ParameterSpace::grid(vec![
        ParameterRange::linspace(-0.1, 0.1, 3),
        ParameterRange::linspace(-0.1, 0.1, 3),
        ParameterRange::linspace(-0.1, 0.1, 3),
        ParameterRange::constant(0.0),
        ParameterRange::constant(0.0),
        ParameterRange::constant(0.0),
        ParameterRange::linspace(0.9, 1.1, 3),
    ])
}

#[test]
fn test_enumeration_count() {
    // Four free parameters with three values each, plus an extra free
    // translation: 3^5
    let mut ranges = vec![ParameterRange::linspace(-1.0, 1.0, 3); 3];
    ranges.extend(vec![
        ParameterRange::linspace(-5.0, 5.0, 3),
        ParameterRange::constant(0.0),
        ParameterRange::constant(0.0),
        ParameterRange::linspace(0.9, 1.1, 3),
    ]);
    let space = ParameterSpace::grid(ranges);
    assert_eq!(space.len(), 243);

    let samples = enumerate_augmented_samples(
        &CompositeTransform::<3>::new(),
        AugmentationFamily::SimilarityEuler,
        Point::origin(),
        &space,
    )
    .unwrap();
    assert_eq!(samples.len(), 243);
    assert_eq!(samples.count(), 243);
}

#[test]
fn test_enumeration_is_restartable() {
    let space = five_by_three();
    let centered = CompositeTransform::<3>::new();

    let first: Vec<Vec<f64>> =
        enumerate_augmented_samples(&centered, AugmentationFamily::Similarity, Point::origin(), &space)
            .unwrap()
            .map(|s| s.unwrap().parameters)
            .collect();
    let second: Vec<Vec<f64>> =
        enumerate_augmented_samples(&centered, AugmentationFamily::Similarity, Point::origin(), &space)
            .unwrap()
            .map(|s| s.unwrap().parameters)
            .collect();

    assert_eq!(first.len(), 81);
    assert_eq!(first, second);
    // Last parameter varies fastest
    assert_eq!(first[0][6], 0.9);
    assert_eq!(first[1][6], 1.0);
    assert_eq!(first[0][2], first[1][2]);
}

#[test]
fn test_wrong_arity_rejected_before_iteration() {
    let space = five_by_three();
    let result = enumerate_augmented_samples(
        &CompositeTransform::<2>::new(),
        AugmentationFamily::Similarity,
        Point::origin(),
        &space,
    );
    assert!(matches!(
        result,
        Err(AugmentError::ParameterArity { expected: 4, actual: 7, .. })
    ));
}

#[test]
fn test_random_space_enumerates() {
    let space = random_sampling(&[(0.9, 1.1), (-0.3, 0.3), (-2.0, 2.0), (-2.0, 2.0)], 20, 3).unwrap();
    let samples = enumerate_augmented_samples(
        &CompositeTransform::<2>::new(),
        AugmentationFamily::Similarity,
        Point::origin(),
        &space,
    )
    .unwrap();
    assert_eq!(samples.len(), 20);
    assert!(samples.map(|s| s.unwrap()).all(|s| s.transform.len() == 1));
}
