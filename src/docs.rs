use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::studio::handler::index,
        crate::modules::studio::handler::generate,
        crate::modules::studio::handler::health,
    ),
    components(
        schemas(
            crate::modules::studio::dto::GenerateRequest,
            crate::modules::studio::dto::GenerateResponse,
            crate::modules::studio::dto::HealthResponse,
            crate::modules::studio::dto::GpuStatus,
            crate::common::response::ErrorBody,
        )
    ),
    tags(
        (name = "Studio", description = "Prompt to video generation")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_studio_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/generate", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
