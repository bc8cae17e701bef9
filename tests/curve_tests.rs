use approx::{assert_abs_diff_eq, assert_relative_eq};
use femtess::TessellationError;
use femtess::curve::{ArcDirection, CircularArc, Curve, GeneralArc, LineSegment, Polyline, Winding};
use femtess::float_types::{FRAC_PI_2, PI, Real};
use nalgebra::{Point3, Vector3};

#[test]
fn line_samples_are_exact_at_both_ends() {
    let a = Point3::new(0.1, 0.2, 0.3);
    let b = Point3::new(-1.7, 4.1, 2.9);
    let line = LineSegment::new(a, b);

    // straight segments are never subdivided
    assert_eq!(line.sample(7, Winding::Forward), vec![a, b]);
    assert_eq!(line.sample(7, Winding::Reverse), vec![b, a]);
    assert_eq!(line.point(0.0), a);
    assert_eq!(line.point(1.0), b);
    assert_relative_eq!(line.point(0.5), Point3::from((a.coords + b.coords) * 0.5), epsilon = 1e-12);
    assert_relative_eq!(line.length(3), (b - a).norm(), epsilon = 1e-12);
}

#[test]
fn circular_arc_samples_stay_on_the_circle() {
    let center = Point3::new(1.0, 2.0, 3.0);
    let start = center + Vector3::new(2.5, 0.0, 0.0);
    let end = center + Vector3::new(0.0, 2.5, 0.0);
    let arc = CircularArc::from_center(center, start, end, &Vector3::z(), ArcDirection::CounterClockwise)
        .expect("valid arc");

    assert_relative_eq!(arc.sweep(), FRAC_PI_2, epsilon = 1e-12);
    let samples = arc.sample(50, Winding::Forward);
    assert_eq!(samples.len(), 51);
    assert_eq!(samples[0], start);
    assert_eq!(samples[50], end);
    for p in &samples {
        assert_abs_diff_eq!((p - center).norm(), 2.5, epsilon = 1e-6);
        assert_abs_diff_eq!(p.z, 3.0, epsilon = 1e-12);
    }
}

#[test]
fn clockwise_arc_takes_the_complement() {
    let center = Point3::origin();
    let start = Point3::new(1.0, 0.0, 0.0);
    let end = Point3::new(0.0, 1.0, 0.0);
    let arc = CircularArc::from_center(center, start, end, &Vector3::z(), ArcDirection::Clockwise).expect("arc");

    assert_relative_eq!(arc.sweep(), -1.5 * PI, epsilon = 1e-12);
    // the long way round passes through -y, then -x
    assert_relative_eq!(arc.point(1.0 / 3.0), Point3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    assert_relative_eq!(arc.point(2.0 / 3.0), Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
}

#[test]
fn coincident_endpoints_make_a_full_circle() {
    let start = Point3::new(2.0, 0.0, 0.0);
    let arc = CircularArc::from_center(Point3::origin(), start, start, &Vector3::z(), ArcDirection::CounterClockwise)
        .expect("arc");
    assert_relative_eq!(arc.sweep(), 2.0 * PI, epsilon = 1e-12);
    assert_relative_eq!(arc.length(400), 4.0 * PI, max_relative = 1e-4);
}

#[test]
fn three_point_arc_passes_through_all_three() {
    let start = Point3::new(1.0, 0.0, 0.0);
    let through = Point3::new(0.0, 1.0, 0.0);
    let end = Point3::new(-1.0, 0.0, 0.0);
    let arc = CircularArc::from_three_points(start, through, end).expect("arc");

    assert_relative_eq!(arc.center(), Point3::origin(), epsilon = 1e-12);
    assert_relative_eq!(arc.radius(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(arc.point(0.5), through, epsilon = 1e-12);
}

#[test]
fn collinear_points_do_not_make_an_arc() {
    let result = CircularArc::from_three_points(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    );
    assert!(matches!(result, Err(TessellationError::DegenerateGeometry { .. })));

    let result = CircularArc::from_center(
        Point3::origin(),
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        &Vector3::z(),
        ArcDirection::CounterClockwise,
    );
    assert!(matches!(result, Err(TessellationError::DegenerateGeometry { .. })));
}

#[test]
fn general_arc_spirals_between_radii() {
    let arc = GeneralArc::from_center(
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 3.0, 0.0),
        &Vector3::z(),
        ArcDirection::CounterClockwise,
    )
    .expect("arc");

    let samples = arc.sample(10, Winding::Forward);
    for (k, p) in samples.iter().enumerate() {
        let t = k as Real / 10.0;
        assert_abs_diff_eq!(p.coords.norm(), 1.0 + 2.0 * t, epsilon = 1e-9);
    }
    assert_eq!(samples[10], Point3::new(0.0, 3.0, 0.0));
}

#[test]
fn polyline_samples_its_own_points() {
    assert!(Polyline::new(vec![Point3::origin()]).is_none());

    let points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 2.0, 0.0)];
    let line = Polyline::new(points.clone()).expect("two or more points");
    assert_eq!(line.sample(50, Winding::Forward), points);
    let mut reversed = points.clone();
    reversed.reverse();
    assert_eq!(line.sample(50, Winding::Reverse), reversed);
}
