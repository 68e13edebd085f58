//! OpenAPI document for the HTTP surface.

use crate::config::Settings;
use crate::handlers::{drug, info};
use crate::model::{Drug, DrugCreate, DrugUpdate};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        info::root,
        info::health,
        info::ready,
        drug::list,
        drug::categories,
        drug::read,
        drug::create,
        drug::update,
        drug::delete,
    ),
    components(schemas(Drug, DrugCreate, DrugUpdate, info::BannerBody, info::HealthBody, info::ReadyBody)),
    tags(
        (name = "drugs", description = "Drug reference records"),
        (name = "service", description = "Banner and health checks"),
    )
)]
pub struct ApiDoc;

/// The document with title, version and description taken from settings.
pub fn document(settings: &Settings) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = settings.api_title.clone();
    doc.info.version = settings.api_version.clone();
    doc.info.description = Some(settings.api_description.clone());
    doc
}
