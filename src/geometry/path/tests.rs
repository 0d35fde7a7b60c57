use super::*;
use crate::geometry::sink::{PathCommand, PathRecorder};

fn replay(path: &PathModel) -> Vec<PathCommand> {
    let mut recorder = PathRecorder::new();
    path.make_canvas_path(&mut recorder);
    recorder.commands
}

fn assert_commands_close(actual: &[PathCommand], expected: &[PathCommand]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        let close = |x: f64, y: f64| (x - y).abs() < 1e-9;
        let ok = match (a, e) {
            (PathCommand::MoveTo(x1, y1), PathCommand::MoveTo(x2, y2))
            | (PathCommand::LineTo(x1, y1), PathCommand::LineTo(x2, y2)) => {
                close(*x1, *x2) && close(*y1, *y2)
            }
            (
                PathCommand::CurveTo(a1, a2, a3, a4, a5, a6),
                PathCommand::CurveTo(b1, b2, b3, b4, b5, b6),
            ) => [a1, a2, a3, a4, a5, a6]
                .iter()
                .zip([b1, b2, b3, b4, b5, b6])
                .all(|(x, y)| close(**x, *y)),
            (PathCommand::Close, PathCommand::Close) => true,
            _ => false,
        };
        assert!(ok, "{a:?} != {e:?}");
    }
}

#[test]
fn primitives_require_an_open_path() {
    let mut path = PathModel::new();
    assert_eq!(
        path.line_to(1.0, 1.0),
        Err(PathError::NoOpenPath {
            operation: "line_to"
        })
    );
    assert!(path.curve_to(0.0, 0.0, 1.0, 1.0, 2.0, 2.0).is_err());
    assert!(path.arc_to(0.0, 0.0, 10.0, 10.0, 0.0, 1.0).is_err());
    assert!(path.close().is_err());
    assert!(path.lines(&[], 0.0, 0.0).is_err());
    assert!(path.bounding_box().is_none());
}

#[test]
fn move_to_closes_the_previous_subpath() {
    let mut path = PathModel::new();
    path.move_to(0.0, 0.0);
    path.line_to(5.0, 0.0).unwrap();
    path.move_to(10.0, 10.0);

    assert_eq!(path.closed_subpaths().len(), 1);
    let closed = &path.closed_subpaths()[0];
    assert_eq!(closed.last().unwrap().kind, PathOpKind::Close);
    assert_eq!(closed.last().unwrap().from, Point::new(5.0, 0.0));
    assert!(path.is_open());
}

#[test]
fn bounding_box_covers_points_and_control_points() {
    let mut path = PathModel::new();
    path.move_to(10.2, 10.0);
    path.line_to(20.0, -4.6).unwrap();
    path.curve_to(-7.5, 3.0, 30.0, 40.4, 15.0, 15.0).unwrap();
    path.close().unwrap();
    path.move_to(2.0, 2.0);
    path.line_to(3.0, 3.0).unwrap();

    // min x -7.5 rounds half up to -7.
    assert_eq!(path.bounding_box(), Some(BoundingBox::new(-7, -5, 30, 40)));
}

#[test]
fn arc_to_grows_box_by_the_full_ellipse_rectangle() {
    let mut path = PathModel::new();
    path.arc(10.0, 20.0, 40.0, 30.0, 0.0, 0.1).unwrap();
    assert_eq!(path.bounding_box(), Some(BoundingBox::new(10, 20, 50, 50)));
}

#[test]
fn arc_sub_path_starts_on_the_ellipse() {
    let mut path = PathModel::new();
    path.arc(0.0, 0.0, 100.0, 50.0, 0.0, 1.0).unwrap();
    let ops = path.open_subpath().unwrap();
    let start = ops[0].to;
    assert!((start.x - 100.0).abs() < 1e-9 && (start.y - 25.0).abs() < 1e-9);
    assert_eq!(ops[1].from, start);
    assert_eq!(path.bounding_box(), Some(BoundingBox::new(0, 0, 100, 50)));
}

#[test]
fn reset_forgets_everything() {
    let mut path = PathModel::new();
    path.rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
    path.reset();
    assert!(path.bounding_box().is_none());
    assert!(!path.is_open());
    assert!(replay(&path).is_empty());
}

#[test]
fn rectangle_is_a_closed_five_point_polygon() {
    let mut path = PathModel::new();
    path.rectangle(1.0, 2.0, 10.0, 20.0).unwrap();
    assert_eq!(
        replay(&path),
        vec![
            PathCommand::MoveTo(1.0, 2.0),
            PathCommand::LineTo(11.0, 2.0),
            PathCommand::LineTo(11.0, 22.0),
            PathCommand::LineTo(1.0, 22.0),
            PathCommand::LineTo(1.0, 2.0),
            PathCommand::Close,
        ]
    );
    assert!(!path.is_open());
}

#[test]
fn rounded_rectangle_with_zero_radius_visits_rectangle_corners() {
    let mut rounded = PathModel::new();
    rounded.rounded_rectangle(0.0, 0.0, 40.0, 20.0, 0.0).unwrap();
    let mut plain = PathModel::new();
    plain.rectangle(0.0, 0.0, 40.0, 20.0).unwrap();

    assert_eq!(rounded.bounding_box(), plain.bounding_box());

    // Every curve collapses to a point already on the outline.
    let vertices: Vec<(f64, f64)> = replay(&rounded)
        .into_iter()
        .filter_map(|c| match c {
            PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => Some((x, y)),
            PathCommand::CurveTo(x1, y1, x2, y2, x3, y3) => {
                assert_eq!((x1, y1), (x3, y3));
                assert_eq!((x2, y2), (x3, y3));
                None
            }
            PathCommand::Close => None,
        })
        .collect();
    assert_eq!(
        vertices,
        vec![(0.0, 0.0), (40.0, 0.0), (40.0, 20.0), (0.0, 20.0), (0.0, 0.0)]
    );
}

#[test]
fn negative_radius_is_a_fraction_of_the_shorter_side() {
    let mut fraction = PathModel::new();
    fraction
        .rounded_rectangle(5.0, 5.0, 60.0, 30.0, -0.5)
        .unwrap();
    let mut absolute = PathModel::new();
    absolute
        .rounded_rectangle(5.0, 5.0, 60.0, 30.0, 15.0)
        .unwrap();
    assert_eq!(replay(&fraction), replay(&absolute));
}

#[test]
fn rounded_rectangle_rejects_out_of_range_radius() {
    let mut path = PathModel::new();
    assert!(matches!(
        path.rounded_rectangle(0.0, 0.0, 60.0, 30.0, 15.5),
        Err(PathError::InvalidRadius { .. })
    ));
    assert!(path.rounded_rectangle(0.0, 0.0, 60.0, 30.0, -0.51).is_err());
    assert!(path.rounded_rectangle(0.0, 0.0, 60.0, 30.0, f64::NAN).is_err());
    assert!(path.bounding_box().is_none());
}

#[test]
fn reverse_twice_restores_line_and_curve_paths() {
    let mut path = PathModel::new();
    path.move_to(0.0, 0.0);
    path.line_to(10.0, 0.0).unwrap();
    path.curve_to(15.0, 0.0, 20.0, 5.0, 20.0, 10.0).unwrap();
    path.close().unwrap();
    path.move_to(30.0, 30.0);
    path.lines(&[Point::new(40.0, 30.0), Point::new(40.0, 45.0)], 0.0, 0.0)
        .unwrap();
    let original = replay(&path);

    let mut twice = path.clone();
    twice.reverse();
    assert_ne!(replay(&twice), original);
    twice.reverse();
    assert_commands_close(&replay(&twice), &original);
}

#[test]
fn reverse_swaps_curve_controls_and_restarts_open_path_at_its_end() {
    let mut path = PathModel::new();
    path.move_to(0.0, 0.0);
    path.curve_to(1.0, 2.0, 3.0, 4.0, 5.0, 6.0).unwrap();
    path.line_to(7.0, 7.0).unwrap();
    path.reverse();

    assert_eq!(
        replay(&path),
        vec![
            PathCommand::MoveTo(7.0, 7.0),
            PathCommand::LineTo(5.0, 6.0),
            PathCommand::CurveTo(3.0, 4.0, 1.0, 2.0, 0.0, 0.0),
        ]
    );
    assert!(path.is_open());
}

#[test]
fn reverse_expands_arcs_into_backwards_curves() {
    let mut path = PathModel::new();
    path.arc(0.0, 0.0, 100.0, 100.0, 0.0, std::f64::consts::PI)
        .unwrap();
    let end = path.open_subpath().unwrap().last().unwrap().to;
    path.reverse();

    let commands = replay(&path);
    assert_eq!(commands[0], PathCommand::MoveTo(end.x, end.y));
    assert!(commands.len() > 1);
    assert!(
        commands[1..]
            .iter()
            .all(|c| matches!(c, PathCommand::CurveTo(..)))
    );
}

#[test]
fn append_closed_only_path_keeps_open_subpath() {
    let mut a = PathModel::new();
    a.rectangle(0.0, 0.0, 5.0, 5.0).unwrap();
    a.rectangle(10.0, 10.0, 5.0, 5.0).unwrap();

    let mut b = PathModel::new();
    b.rectangle(-20.0, -20.0, 2.0, 2.0).unwrap();
    b.move_to(50.0, 50.0);
    b.line_to(60.0, 55.0).unwrap();
    let open_before = b.open_subpath().unwrap().to_vec();

    b.append(&a);
    assert_eq!(b.closed_subpaths().len(), 3);
    assert_eq!(b.open_subpath().unwrap(), open_before.as_slice());
    assert_eq!(b.bounding_box(), Some(BoundingBox::new(-20, -20, 60, 55)));
}

#[test]
fn append_bridges_two_open_paths_with_a_line() {
    let mut a = PathModel::new();
    a.move_to(0.0, 0.0);
    a.line_to(1.0, 0.0).unwrap();
    let mut b = PathModel::new();
    b.move_to(5.0, 5.0);
    b.line_to(6.0, 6.0).unwrap();

    a.append(&b);
    assert_eq!(
        replay(&a),
        vec![
            PathCommand::MoveTo(0.0, 0.0),
            PathCommand::LineTo(1.0, 0.0),
            PathCommand::LineTo(5.0, 5.0),
            PathCommand::LineTo(6.0, 6.0),
        ]
    );
}

#[test]
fn append_onto_empty_path_adopts_everything() {
    let mut a = PathModel::new();
    let mut b = PathModel::new();
    b.move_to(3.0, 4.0);
    b.line_to(8.0, 9.0).unwrap();
    a.append(&b);
    assert_eq!(replay(&a), replay(&b));
    assert_eq!(a.bounding_box(), b.bounding_box());
}

#[test]
fn translate_and_scale_rewrite_every_coordinate() {
    let mut path = PathModel::new();
    path.move_to(1.0, 2.0);
    path.curve_to(3.0, 4.0, 5.0, 6.0, 7.0, 8.0).unwrap();
    path.close().unwrap();

    path.translate(10.0, 20.0);
    path.scale(2.0, 0.5);

    let closed = &path.closed_subpaths()[0];
    assert_eq!(closed[0].to, Point::new(22.0, 11.0));
    assert_eq!(
        closed[1].kind,
        PathOpKind::CurveTo {
            c1: Point::new(26.0, 12.0),
            c2: Point::new(30.0, 13.0),
        }
    );
    assert_eq!(closed[1].from, Point::new(22.0, 11.0));
    assert_eq!(closed[2].from, Point::new(34.0, 14.0));
}

#[test]
fn rotate_floors_mapped_coordinates() {
    let mut path = PathModel::new();
    path.move_to(10.0, 0.0);
    path.line_to(0.0, 10.0).unwrap();
    path.rotate(std::f64::consts::FRAC_PI_2);

    assert_eq!(
        replay(&path),
        vec![
            PathCommand::MoveTo(0.0, -10.0),
            PathCommand::LineTo(10.0, 0.0),
        ]
    );
}

#[test]
fn display_lists_rounded_replay() {
    let mut path = PathModel::new();
    path.move_to(0.4, 0.6);
    path.line_to(2.5, 3.0).unwrap();
    assert_eq!(path.to_string(), "move_to(0,1)\nline_to(3,3)\n");
}
