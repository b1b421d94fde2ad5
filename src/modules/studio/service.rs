use super::dto::{GenerateResponse, GpuStatus, HealthResponse};
use crate::common::response::ApiError;
use crate::infrastructure::pipeline::GenerationJob;
use crate::state::AppState;
use axum::http::StatusCode;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{error, info, warn};

pub const VIDEO_DURATION_SECS: u32 = 5;
pub const VIDEO_WIDTH: u32 = 512;
pub const VIDEO_HEIGHT: u32 = 512;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("GPU is busy")]
    Busy,

    #[error("{0}")]
    Failed(String),
}

// Both kinds are reported in the body, never through the status code.
impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        ApiError(e.to_string(), StatusCode::OK)
    }
}

pub fn artifact_filename(unix_secs: i64) -> String {
    format!("vid_{}.mp4", unix_secs)
}

pub struct StudioService;

impl StudioService {
    pub async fn generate(
        state: AppState,
        prompt: String,
    ) -> Result<GenerateResponse, GenerationError> {
        let Some(permit) = state.gate.try_acquire() else {
            warn!("Rejected generation request: GPU is busy");
            return Err(GenerationError::Busy);
        };

        let filename = artifact_filename(OffsetDateTime::now_utc().unix_timestamp());
        let save_path = state.config.output_dir.join(&filename);
        let job = GenerationJob {
            prompt,
            duration_secs: VIDEO_DURATION_SECS,
            width: VIDEO_WIDTH,
            height: VIDEO_HEIGHT,
            save_path: save_path.clone(),
        };

        info!("🎬 Generating {} ({}x{}, {}s)", filename, job.width, job.height, job.duration_secs);

        // The permit lives inside the blocking task, so the gate stays held until
        // the model returns even if the client has already gone away.
        let pipeline = state.pipeline.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline.generate(&job)
        })
        .await;

        match outcome {
            Ok(Ok(())) => {
                info!("✅ Generation finished: {}", save_path.display());
                Ok(GenerateResponse {
                    url: format!("/outputs/{}", filename),
                    path: save_path.display().to_string(),
                })
            }
            Ok(Err(e)) => {
                error!("❌ Generation failed for {}: {}", filename, e);
                Err(GenerationError::Failed(e.to_string()))
            }
            Err(e) => {
                error!("❌ Generation task for {} aborted: {}", filename, e);
                Err(GenerationError::Failed(format!("generation task aborted: {}", e)))
            }
        }
    }

    pub fn health(state: &AppState) -> HealthResponse {
        let gpu = if state.gate.is_busy() {
            GpuStatus::Busy
        } else {
            GpuStatus::Free
        };

        HealthResponse {
            status: "ok".to_string(),
            gpu,
        }
    }
}
