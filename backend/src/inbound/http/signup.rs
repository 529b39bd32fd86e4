//! Account signup API handler.
//!
//! ```text
//! POST /api/v1/accounts {"name":"...","email":"...","phone":"0911223344",...}
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AccountType, Error, SignupForm};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Signup request body for `POST /api/v1/accounts`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub account_type: Option<AccountType>,
    pub initial_deposit: i64,
    #[serde(default)]
    pub bank: Option<String>,
    pub terms: bool,
}

impl From<SignupRequest> for SignupForm {
    fn from(value: SignupRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            city: value.city,
            state: value.state,
            account_type: value.account_type,
            initial_deposit: value.initial_deposit,
            bank: value.bank,
            terms: value.terms,
        }
    }
}

/// Create a user and bank account from a signup submission.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Validation failed", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "createAccount",
    security([])
)]
#[post("/accounts")]
pub async fn create_account(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    state
        .signup
        .create_account(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(json!({ "message": "account created" })))
}
