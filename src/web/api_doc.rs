use utoipa::OpenApi;

use crate::formatter::{PassRow, TimelineItem, WindowRow};
use crate::predict::{CommonWindow, Pass, Subpoint};

use super::api::error::ErrorResponse;
use super::api::position::PositionRequest;
use super::api::visibility::{
    StationInput, StationPasses, TleInput, VisibilityRequest, VisibilityResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::visibility::compute_visibility,
        super::api::position::compute_position,
    ),
    components(
        schemas(
            VisibilityRequest,
            VisibilityResponse,
            PositionRequest,
            TleInput,
            StationInput,
            StationPasses,
            Pass,
            CommonWindow,
            Subpoint,
            PassRow,
            WindowRow,
            TimelineItem,
            ErrorResponse,
        )
    ),
    info(
        title = "Covis API",
        description = "Satellite pass prediction and dual ground station common visibility windows",
        version = "0.1.0"
    ),
    tags(
        (name = "visibility", description = "Pass and common-window prediction"),
        (name = "position", description = "Ground-track position")
    )
)]
pub struct ApiDoc;
