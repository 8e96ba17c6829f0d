use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SessionAddon;

impl Modify for SessionAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Session-Id"))),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::region::search_regions,
        handlers::region::select_region,
        handlers::region::get_provinces,
        handlers::region::get_cities,
        handlers::region::get_counties,
        handlers::region::get_cascade,
        handlers::form::get_form_options,
        handlers::session::create_session,
        handlers::session::get_session,
        handlers::session::close_session,
        handlers::session::list_records,
        handlers::session::append_record,
        handlers::session::export_records,
    ),
    components(
        schemas(
            AdminRegion,
            RegionCandidate,
            RegionSearchResponse,
            RegionSelectResponse,
            CascadeSelection,
            SubsidyType,
            UnitOption,
            DateParts,
            CreateRecordRequest,
            SubsidyRecord,
            DateBounds,
            FormDefaults,
            FormOptions,
            SessionInfo,
            RecordListResponse,
            AppendRecordResponse,
            ApiError,
        )
    ),
    modifiers(&SessionAddon),
    tags(
        (name = "region", description = "Administrative region lookup API"),
        (name = "form", description = "Subsidy form options API"),
        (name = "session", description = "Entry session and record API"),
    ),
    info(
        title = "PV Subsidy Policy Input API",
        version = "0.1.0",
        description = "光伏补贴政策录入工具 REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
