use burn::tensor::{Shape, Tensor, TensorData};
use burn_ndarray::NdArray;
use ritk_core::filter::ResampleImageFilter;
use ritk_core::image::Image;
use ritk_core::interpolation::InterpolationKind;
use ritk_core::spatial::{Point, Spacing, Direction};
use ritk_core::transform::ReflectionTransform;
use nalgebra::{Vector3, Rotation3};
use std::f64::consts::PI;

type Backend = NdArray<f32>;
type Point3 = Point<3>;
type Spacing3 = Spacing<3>;

#[test]
fn test_rotated_image_transform() {
    let device = Default::default();
    let data = Tensor::<Backend, 3>::zeros([10, 10, 10], &device);

    // 90 degrees about Z: X -> Y, Y -> -X
    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), PI / 2.0);
    let direction = Direction(rotation.into_inner());

    let image = Image::new(data, Point3::origin(), Spacing3::uniform(1.0), direction);

    // R_z(-90) * (1, 0, 0) = (0, -1, 0)
    let point = Point3::new([1.0, 0.0, 0.0]);
    let index = image.transform_physical_point_to_continuous_index(&point).unwrap();

    assert!((index[0] - 0.0).abs() < 1e-9, "Expected index[0] to be 0.0, got {}", index[0]);
    assert!((index[1] - (-1.0)).abs() < 1e-9, "Expected index[1] to be -1.0, got {}", index[1]);
    assert!((index[2] - 0.0).abs() < 1e-9, "Expected index[2] to be 0.0, got {}", index[2]);

    let points_tensor = Tensor::<Backend, 2>::from_floats([[1.0, 0.0, 0.0]], &device);
    let indices_tensor = image.geometry().world_to_index_tensor(points_tensor).unwrap();
    let indices_data = indices_tensor.into_data();
    let indices = indices_data.as_slice::<f32>().unwrap();

    assert!((indices[0] - 0.0).abs() < 1e-5, "Tensor: Expected index[0] to be 0.0, got {}", indices[0]);
    assert!((indices[1] - (-1.0)).abs() < 1e-5, "Tensor: Expected index[1] to be -1.0, got {}", indices[1]);
    assert!((indices[2] - 0.0).abs() < 1e-5, "Tensor: Expected index[2] to be 0.0, got {}", indices[2]);
}

#[test]
fn test_reflection_resample_matches_flip() {
    let device = Default::default();
    let values: Vec<f32> = (0..60).map(|v| v as f32).collect();
    let data = Tensor::<Backend, 3>::from_data(TensorData::new(values, Shape::new([3, 4, 5])), &device);
    let image = Image::new(
        data,
        Point3::new([-2.0, 1.0, 4.0]),
        Spacing3::new([0.5, 1.5, 2.0]),
        Direction::identity(),
    );

    for axes in [vec![0], vec![1], vec![2], vec![0, 2], vec![0, 1, 2]] {
        let reflection = ReflectionTransform::new(&axes, image.geometry().grid_midpoint());
        let resampled = ResampleImageFilter::new_from_reference(&image, reflection, InterpolationKind::Nearest)
            .apply(&image)
            .unwrap()
            .into_data()
            .into_data();
        let flipped = image.flip_axes(&axes).into_data().into_data();

        assert_eq!(
            resampled.as_slice::<f32>().unwrap(),
            flipped.as_slice::<f32>().unwrap(),
            "axes {:?}",
            axes
        );
    }
}
