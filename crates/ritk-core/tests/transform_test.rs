use burn::tensor::Tensor;
use burn_ndarray::NdArray;
use nalgebra::SMatrix;
use ritk_core::spatial::{Point, Vector};
use ritk_core::transform::{
    AffineTransform, CompositeTransform, RadialDistortionTransform, ReflectionTransform,
    SimilarityTransform, Transform, TranslationTransform,
};

type TestBackend = NdArray<f32>;

fn sample_points() -> Vec<Point<3>> {
    vec![
        Point::new([0.0, 0.0, 0.0]),
        Point::new([12.5, -3.0, 7.0]),
        Point::new([-40.0, 22.0, 1.5]),
    ]
}

#[test]
fn test_affine_collapse_matches_sequential_application() {
    let similarity = SimilarityTransform::<3>::from_parameters(
        &[0.05, -0.1, 0.2, 1.0, 2.0, -3.0, 0.9],
        Point::new([10.0, 10.0, 10.0]),
    )
    .unwrap();
    let affine = AffineTransform::new(
        SMatrix::<f64, 3, 3>::new(1.0, 0.1, 0.0, 0.0, 1.2, 0.0, 0.05, 0.0, 0.8),
        Vector::new([4.0, 0.0, -1.0]),
        Point::new([1.0, 2.0, 3.0]),
    );
    let composite = CompositeTransform::new()
        .then_inner(TranslationTransform::new(Vector::new([1.0, 1.0, 1.0])))
        .then_inner(similarity)
        .then_inner(ReflectionTransform::new(&[1], Point::new([5.0, 5.0, 5.0])))
        .then_inner(affine);

    let collapsed = composite.to_affine().unwrap();
    for p in sample_points() {
        let expected = composite.transform_point(&p);
        assert!(collapsed.transform_point(&p).max_abs_diff(&expected) < 1e-9);
    }
}

#[test]
fn test_composite_tensor_path_with_distortion() {
    let device = Default::default();
    let composite = CompositeTransform::<3>::compose(
        SimilarityTransform::from_parameters(&[0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 1.0], Point::origin()).unwrap(),
        RadialDistortionTransform::new([1e-4, 0.0, 0.0], Point::new([2.0, 2.0, 2.0])),
    );

    let points = sample_points();
    let rows: Vec<[f32; 3]> = points
        .iter()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();
    let tensor = Tensor::<TestBackend, 2>::from_floats([rows[0], rows[1], rows[2]], &device);
    let out = composite.transform_points(tensor).into_data();
    let out = out.as_slice::<f32>().unwrap();

    for (row, p) in points.iter().enumerate() {
        let expected = composite.transform_point(p);
        for axis in 0..3 {
            assert!((out[row * 3 + axis] as f64 - expected[axis]).abs() < 1e-3);
        }
    }
}

#[test]
fn test_composite_inverse_roundtrip() {
    let composite = CompositeTransform::<2>::new()
        .then_inner(AffineTransform::from_direction(
            &ritk_core::spatial::Direction::identity(),
            Vector::new([5.0, -5.0]),
        ))
        .then_inner(SimilarityTransform::from_parameters(&[1.1, 0.4, 2.0, 3.0], Point::new([50.0, 60.0])).unwrap());

    let inverse = composite.inverse().unwrap();
    let p = Point::new([17.0, 93.0]);
    assert!(inverse.transform_point(&composite.transform_point(&p)).max_abs_diff(&p) < 1e-9);
}
