//! Admin export API handlers.
//!
//! ```text
//! POST /api/v1/admin/login {"password":"..."}
//! GET /api/v1/admin/users/export?city=adama&bank=coop
//! ```
//!
//! The export is gated by a shared secret checked server-side; a successful
//! login marks the session cookie and the export endpoint requires it.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::Error;
use crate::inbound::http::auth::verify_export_password;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;
use crate::outbound::spreadsheet::{export_file_name, render_user_workbook};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Login request body for `POST /api/v1/admin/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// Query parameters for the user export.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ExportQuery {
    /// City slug the users registered under.
    pub city: String,
    /// Partner-bank slug the users registered under.
    pub bank: String,
}

/// Authenticate against the export shared secret and mark the session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid password", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AdminLoginRequest>,
) -> ApiResult<HttpResponse> {
    verify_export_password(&payload.password, &state.export_password)?;
    session.persist_admin()?;
    info!("admin session established");
    Ok(HttpResponse::Ok().finish())
}

/// Export the users of one city and bank as an `.xlsx` attachment.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/export",
    params(ExportQuery),
    responses(
        (
            status = 200,
            description = "Workbook attachment",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ),
        (status = 400, description = "Missing filter", body = Error),
        (status = 401, description = "Admin login required", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "exportUsers"
)]
#[get("/admin/users/export")]
pub async fn export_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ExportQuery>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let ExportQuery { city, bank } = query.into_inner();
    if city.trim().is_empty() || bank.trim().is_empty() {
        return Err(Error::invalid_request("city and bank filters are required"));
    }

    let records = state.exports.export_users(&city, &bank).await?;
    let buffer = render_user_workbook(&records, &city, &bank).map_err(|err| {
        error!(error = %err, "workbook rendering failed");
        Error::internal("workbook rendering failed")
    })?;
    info!(city, bank, rows = records.len(), "user export rendered");

    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export_file_name(&city, &bank))],
        })
        .body(buffer))
}
