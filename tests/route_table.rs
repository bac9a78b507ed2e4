//! Route table behaviour through the public API.

use iviewer_routes::routing::{iviewer_routes, PlaneRange, ReverseError, RouteTable, View};

fn table() -> RouteTable<View> {
    iviewer_routes("/").unwrap()
}

#[test]
fn test_route_names_unique_and_ordered() {
    let table = table();
    let names: Vec<&str> = table.routes().iter().map(|r| r.name()).collect();
    assert_eq!(
        names,
        vec![
            "omero_iviewer_index",
            "omero_iviewer_persist_rois",
            "omero_iviewer_image_data",
            "omero_iviewer_image_data_deltat",
            "omero_iviewer_roi_image_data",
            "omero_iviewer_save_projection",
            "omero_iviewer_well_images",
            "omero_iviewer_get_intensity",
            "omero_iviewer_shape_stats",
            "omero_iviewer_rois_by_plane",
            "omero_iviewer_plane_shape_counts",
            "omero_iviewer_roi_page_data",
        ]
    );
}

#[test]
fn test_rois_by_plane_without_ranges() {
    let m = table().resolve("/rois_by_plane/5/2/3/").unwrap();
    assert_eq!(m.name, "omero_iviewer_rois_by_plane");
    assert_eq!(m.required::<u64>("image_id").unwrap(), 5);

    let z: PlaneRange<u32> = m.range("the_z", "z_end").unwrap();
    assert_eq!(z, PlaneRange { start: 2, end: None });

    let t: PlaneRange<String> = m.range("the_t", "t_end").unwrap();
    assert_eq!(t.start, "3");
    assert!(!t.is_bounded());
}

#[test]
fn test_rois_by_plane_with_ranges() {
    let m = table().resolve("/rois_by_plane/5/2-10/3-8/").unwrap();
    let z: PlaneRange<u32> = m.range("the_z", "z_end").unwrap();
    let t: PlaneRange<u32> = m.range("the_t", "t_end").unwrap();
    assert_eq!(z, PlaneRange { start: 2, end: Some(10) });
    assert_eq!(t, PlaneRange { start: 3, end: Some(8) });
}

#[test]
fn test_persist_rois_slash_optional() {
    let table = table();
    assert_eq!(table.resolve("/persist_rois"), table.resolve("/persist_rois/"));
    assert_eq!(table.resolve("/persist_rois").unwrap().handler, View::PersistRois);
}

#[test]
fn test_unknown_path() {
    assert!(table().resolve("/unknown/").is_none());
}

#[test]
fn test_reverse_under_mount_prefix() {
    let table = iviewer_routes("/iviewer/").unwrap();
    assert_eq!(
        table.reverse("omero_iviewer_roi_image_data", &[("obj_type", "roi"), ("obj_id", "7")]),
        Ok("/iviewer/roi/7/image_data/".to_string())
    );
    assert_eq!(
        table.reverse(
            "omero_iviewer_rois_by_plane",
            &[("image_id", "5"), ("the_z", "2"), ("the_t", "3"), ("t_end", "8")]
        ),
        Ok("/iviewer/rois_by_plane/5/2/3-8/".to_string())
    );
    assert_eq!(
        table.reverse("omero_iviewer_image_data", &[]),
        Err(ReverseError::MissingParam("image_id".into()))
    );
}
