//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: all HTTP endpoints from the inbound layer, the shared
//! error envelope, and the admin session cookie security scheme.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, LocationEntry, UserRecord};
use crate::inbound::http::export::AdminLoginRequest;
use crate::inbound::http::signup::SignupRequest;
use crate::inbound::http::vouchers::{VoucherReceiptDto, VoucherRequestDto};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/admin/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tugza backend API",
        description = "HTTP interface for account signup, voucher issuance, \
                       location lookups, and the admin user export."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::signup::create_account,
        crate::inbound::http::vouchers::issue_voucher,
        crate::inbound::http::locations::list_locations,
        crate::inbound::http::export::admin_login,
        crate::inbound::http::export::export_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LocationEntry,
        UserRecord,
        SignupRequest,
        AdminLoginRequest,
        VoucherRequestDto,
        VoucherReceiptDto,
    )),
    tags(
        (name = "accounts", description = "Bank account signup"),
        (name = "vouchers", description = "Digital-money voucher issuance"),
        (name = "locations", description = "Location cascade lookups"),
        (name = "admin", description = "Session-gated export operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_registers_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/api/v1/accounts",
            "/api/v1/vouchers",
            "/api/v1/locations",
            "/api/v1/admin/login",
            "/api/v1/admin/users/export",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }

    #[test]
    fn document_serialises_to_json() {
        let json = ApiDoc::openapi().to_json().expect("document serialises");
        assert!(json.contains("SessionCookie"));
    }
}
