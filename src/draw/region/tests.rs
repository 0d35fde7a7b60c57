use super::*;

fn link(id: u64, width: i32, height: i32) -> ContextLink {
    ContextLink {
        id,
        width,
        height,
        initial: Rc::new(Cell::new(AffineTransform::identity())),
    }
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> Region {
    let mut region = Region::new().unwrap();
    region.set_rectangle(x, y, w, h).unwrap();
    region
}

#[test]
fn detached_rectangle_tracks_its_box_and_pixels() {
    let mut region = rect(10.0, 10.0, 20.0, 20.0);
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(10, 10, 30, 30)));
    assert!(region.in_region(15.0, 15.0).unwrap());
    assert!(!region.in_region(5.0, 15.0).unwrap());
    assert!(!region.in_region(40.0, 40.0).unwrap());
    assert_eq!(region.context_id(), None);
}

#[test]
fn intersect_with_itself_keeps_the_box() {
    let mut region = rect(10.0, 10.0, 20.0, 20.0);
    let copy = region.try_clone().unwrap();
    region.intersect(&copy).unwrap();
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(10, 10, 30, 30)));
    assert!(region.in_region(20.0, 20.0).unwrap());
}

#[test]
fn subtract_removes_pixels_but_box_is_the_union() {
    let mut region = rect(0.0, 0.0, 40.0, 20.0);
    let right = rect(20.0, 0.0, 30.0, 20.0);
    region.subtract(&right).unwrap();
    assert!(region.in_region(5.0, 5.0).unwrap());
    assert!(!region.in_region(25.0, 5.0).unwrap());
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(0, 0, 50, 20)));
}

#[test]
fn union_grows_a_detached_surface() {
    let mut region = rect(0.0, 0.0, 10.0, 10.0);
    let far = rect(50.0, 60.0, 10.0, 10.0);
    region.union(&far).unwrap();
    assert!(region.in_region(55.0, 65.0).unwrap());
    assert!(region.in_region(5.0, 5.0).unwrap());
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(0, 0, 60, 70)));
}

#[test]
fn xor_clears_the_overlap() {
    let mut region = rect(0.0, 0.0, 20.0, 10.0);
    let other = rect(10.0, 0.0, 20.0, 10.0);
    region.xor(&other).unwrap();
    assert!(region.in_region(5.0, 5.0).unwrap());
    assert!(!region.in_region(15.0, 5.0).unwrap());
    assert!(region.in_region(25.0, 5.0).unwrap());
}

#[test]
fn regions_from_different_contexts_do_not_combine() {
    let mut a = Region::with_link(link(1, 50, 50)).unwrap();
    let b = Region::with_link(link(2, 50, 50)).unwrap();
    assert!(matches!(a.union(&b), Err(DrawError::RegionMismatch)));

    let detached = rect(0.0, 0.0, 5.0, 5.0);
    assert!(matches!(a.intersect(&detached), Err(DrawError::RegionMismatch)));
}

#[test]
fn associated_region_reports_the_device_rectangle() {
    let mut region = Region::with_link(link(7, 80, 40)).unwrap();
    assert_eq!(region.context_id(), Some(7));
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(0, 0, 80, 40)));
    assert!(!region.is_empty().unwrap());
    assert!(region.in_region(80.0, 40.0).unwrap());
    assert!(!region.in_region(81.0, 0.0).unwrap());
}

#[test]
fn membership_uses_the_initial_matrix() {
    let l = link(3, 100, 100);
    let initial = Rc::clone(&l.initial);
    let mut region = Region::with_link(l).unwrap();
    assert!(region.in_region(60.0, 60.0).unwrap());

    initial.set(AffineTransform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
    assert!(!region.in_region(60.0, 60.0).unwrap());
}

#[test]
fn emptiness_needs_a_context() {
    let region = rect(0.0, 0.0, 5.0, 5.0);
    assert!(matches!(region.is_empty(), Err(DrawError::RegionWithoutContext)));

    let mut flat = Region::with_link(link(4, 20, 20)).unwrap();
    flat.set_rectangle(5.0, 5.0, 10.0, 0.0).unwrap();
    assert!(flat.is_empty().unwrap());
}

#[test]
fn polygon_uses_both_offsets() {
    let mut region = Region::new().unwrap();
    let triangle = [Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(0.0, 20.0)];
    region
        .set_polygon(&triangle, 5.0, 10.0, FillRule::Winding)
        .unwrap();
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(5, 10, 25, 30)));
    assert!(region.in_region(8.0, 13.0).unwrap());
    assert!(!region.in_region(22.0, 27.0).unwrap());
}

#[test]
fn set_path_leaves_the_source_path_alone() {
    let mut path = PathModel::new();
    path.rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
    let before = path.clone();

    let mut region = Region::new().unwrap();
    region.set_path(&path, 30.0, 40.0, FillRule::OddEven).unwrap();
    assert_eq!(path, before);
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(30, 40, 40, 50)));
    assert!(region.in_region(35.0, 45.0).unwrap());
    assert!(!region.in_region(5.0, 5.0).unwrap());
}

#[test]
fn negative_coordinates_are_inside_their_shape() {
    let mut region = rect(-20.0, -30.0, 10.0, 10.0);
    assert_eq!(region.bounding_box(), Some(BoundingBox::new(-20, -30, -10, -20)));
    assert!(region.in_region(-15.0, -25.0).unwrap());
    assert!(!region.in_region(-25.0, -25.0).unwrap());
}

#[test]
fn far_shapes_only_need_a_surface_their_own_size() {
    let mut region = rect(40_000.0, 50_000.0, 10.0, 10.0);
    assert_eq!((region.surface().width(), region.surface().height()), (11, 11));
    assert!(region.in_region(40_005.0, 50_005.0).unwrap());
    assert!(!region.in_region(5.0, 5.0).unwrap());
}

#[test]
fn intersect_lines_up_offset_surfaces() {
    let mut region = rect(0.0, 0.0, 20.0, 20.0);
    let other = rect(10.0, 10.0, 20.0, 20.0);
    region.intersect(&other).unwrap();
    assert!(region.in_region(15.0, 15.0).unwrap());
    assert!(!region.in_region(5.0, 5.0).unwrap());
    assert!(!region.in_region(25.0, 25.0).unwrap());
}

#[test]
fn union_reaches_into_negative_space() {
    let mut region = rect(0.0, 0.0, 10.0, 10.0);
    let left = rect(-30.0, -30.0, 10.0, 10.0);
    region.union(&left).unwrap();
    assert!(region.in_region(-25.0, -25.0).unwrap());
    assert!(region.in_region(5.0, 5.0).unwrap());
    assert!(!region.in_region(-5.0, -5.0).unwrap());
}

#[test]
fn ellipse_excludes_corners() {
    let mut region = Region::new().unwrap();
    region.set_ellipse(0.0, 0.0, 40.0, 40.0).unwrap();
    assert!(region.in_region(20.0, 20.0).unwrap());
    assert!(!region.in_region(1.0, 1.0).unwrap());
}
