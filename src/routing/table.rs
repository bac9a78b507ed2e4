//! The iviewer route table.
//!
//! Patterns are relative to the mount prefix and must stay exactly as
//! declared: templates, client code and reverse lookups depend on the
//! route names and capture-group names.

use std::fmt;

use serde::Serialize;

use crate::routing::router::RouteTable;
use crate::routing::types::RouteError;

/// Views the iviewer routes dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Index,
    PersistRois,
    ImageData,
    DeltaTData,
    RoiImageData,
    SaveProjection,
    WellImages,
    GetIntensity,
    ShapeStats,
    RoisByPlane,
    PlaneShapeCounts,
    RoiPageData,
}

impl View {
    /// Every view, in route declaration order.
    pub const fn all() -> &'static [View] {
        &[
            View::Index,
            View::PersistRois,
            View::ImageData,
            View::DeltaTData,
            View::RoiImageData,
            View::SaveProjection,
            View::WellImages,
            View::GetIntensity,
            View::ShapeStats,
            View::RoisByPlane,
            View::PlaneShapeCounts,
            View::RoiPageData,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Index => "index",
            View::PersistRois => "persist_rois",
            View::ImageData => "image_data",
            View::DeltaTData => "delta_t_data",
            View::RoiImageData => "roi_image_data",
            View::SaveProjection => "save_projection",
            View::WellImages => "well_images",
            View::GetIntensity => "get_intensity",
            View::ShapeStats => "shape_stats",
            View::RoisByPlane => "rois_by_plane",
            View::PlaneShapeCounts => "plane_shape_counts",
            View::RoiPageData => "roi_page_data",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (pattern, view, route name) in match order.
const IVIEWER_ROUTES: &[(&str, View, &str)] = &[
    // general entry point for the viewer app
    (r"^$", View::Index, "omero_iviewer_index"),
    (r"^persist_rois/?$", View::PersistRois, "omero_iviewer_persist_rois"),
    (
        r"^image_data/(?P<image_id>[0-9]+)/$",
        View::ImageData,
        "omero_iviewer_image_data",
    ),
    (
        r"^image_data/(?P<image_id>[0-9]+)/delta_t/$",
        View::DeltaTData,
        "omero_iviewer_image_data_deltat",
    ),
    // image data for the image linked to an ROI or shape
    (
        r"^(?P<obj_type>(roi|shape))/(?P<obj_id>[0-9]+)/image_data/$",
        View::RoiImageData,
        "omero_iviewer_roi_image_data",
    ),
    (r"^save_projection/?$", View::SaveProjection, "omero_iviewer_save_projection"),
    (r"^well_images/?$", View::WellImages, "omero_iviewer_well_images"),
    (r"^get_intensity/?$", View::GetIntensity, "omero_iviewer_get_intensity"),
    (r"^shape_stats/?$", View::ShapeStats, "omero_iviewer_shape_stats"),
    // optional z or t range, e.g. <image_id>/0-10/2-5/
    (
        concat!(
            r"^rois_by_plane/(?P<image_id>[0-9]+)/",
            r"(?P<the_z>[0-9]+)(?:-(?P<z_end>[0-9]+))?/",
            r"(?P<the_t>[0-9:]+)(?:-(?P<t_end>[0-9]+))?/$",
        ),
        View::RoisByPlane,
        "omero_iviewer_rois_by_plane",
    ),
    (
        r"^plane_shape_counts/(?P<image_id>[0-9]+)/$",
        View::PlaneShapeCounts,
        "omero_iviewer_plane_shape_counts",
    ),
    // index of an ROI among all ROIs of its image, for pagination
    (
        r"^(?P<obj_type>(roi|shape))/(?P<obj_id>[0-9]+)/page_data/$",
        View::RoiPageData,
        "omero_iviewer_roi_page_data",
    ),
];

/// Build the iviewer route table mounted under `mount_prefix`.
pub fn iviewer_routes(mount_prefix: &str) -> Result<RouteTable<View>, RouteError> {
    IVIEWER_ROUTES
        .iter()
        .fold(RouteTable::builder().mount(mount_prefix), |builder, &(pattern, view, name)| {
            builder.route(pattern, view, name)
        })
        .build()
}
