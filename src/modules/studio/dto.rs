use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Where the browser can play the video, e.g. `/outputs/vid_1700000000.mp4`.
    pub url: String,
    /// Location of the file on the server's disk.
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GpuStatus {
    Free,
    Busy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub gpu: GpuStatus,
}
