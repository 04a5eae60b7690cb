use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(description = "Equiptrack API Documentation", license(name = "MIT or Apache2", identifier="MIT Apache2.0"), title = "Equiptrack", version = env!("CARGO_PKG_VERSION")),
    paths(
        crate::equipment::post_equipment,
        crate::equipment::get_equipment,
        crate::equipment::list_equipment,
        crate::files::upload_file,
        crate::files::list_files,
        crate::files::list_files_by_type,
        crate::files::get_file,
        crate::files::update_file_info,
        crate::files::delete_file,
        crate::files::download_file
    )
)]
pub struct ApiDoc;

pub(crate) fn api_route<T: Clone + Sync + Send + 'static>() -> Router<T> {
    let doc = ApiDoc::openapi();
    Router::new().merge(SwaggerUi::new("/api/v1/swagger-ui").url("/api/v1/openapi.json", doc))
}
