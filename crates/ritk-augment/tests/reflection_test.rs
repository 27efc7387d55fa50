use burn::tensor::{Shape, Tensor, TensorData};
use burn_ndarray::NdArray;
use ritk_augment::{
    build_centered_transform, build_reference_domain, fold_reflection, FilterResampler, ReferenceSize, Resampler,
};
use ritk_core::image::Image;
use ritk_core::interpolation::InterpolationKind;
use ritk_core::spatial::{Direction, Point, Spacing, Vector};
use ritk_core::transform::TranslationTransform;

type Backend = NdArray<f32>;

fn host(image: &Image<Backend, 3>) -> Vec<f32> {
    image.data().clone().into_data().iter::<f32>().collect()
}

#[test]
fn test_folded_reflection_matches_flip() {
    let device = Default::default();
    let (nx, ny, nz) = (9, 11, 7);
    let values: Vec<f32> = (0..nx * ny * nz).map(|i| ((i * 37) % 101) as f32).collect();
    let data = Tensor::<Backend, 3>::from_data(TensorData::new(values, Shape::new([nz, ny, nx])), &device);

    // Quarter turn about z, away from the origin.
    let image = Image::new(
        data,
        Point::new([12.0, -4.0, 3.0]),
        Spacing::uniform(1.0),
        Direction::from_row_major(&[0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
    );

    // Half the native spacing.
    let domain = build_reference_domain(&[image.geometry()], &ReferenceSize::Fixed([17, 21, 13])).unwrap();
    let centered = build_centered_transform(&image.geometry(), &domain).unwrap();
    let augmented = centered.then_inner(TranslationTransform::new(Vector::new([0.1, -0.2, 0.05])));

    for axes in [vec![0], vec![1], vec![2], vec![0, 2], vec![0, 1, 2]] {
        let resampled = FilterResampler
            .resample(&image, domain.geometry(), &augmented, InterpolationKind::Linear, -1.0)
            .unwrap();
        let flipped = host(&resampled.flip_axes(&axes));

        let folded = fold_reflection(&augmented, &domain, &axes).unwrap();
        let one_pass = host(
            &FilterResampler
                .resample(&image, domain.geometry(), &folded, InterpolationKind::Linear, -1.0)
                .unwrap(),
        );

        let max_diff = one_pass
            .iter()
            .zip(&flipped)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_diff < 1e-2, "axes {:?}: max difference {}", axes, max_diff);
    }
}
