//! Location cascade API handler.
//!
//! Proxies the external location API so browser forms can populate their
//! country, state, and city selects without a cross-origin call:
//!
//! ```text
//! GET /api/v1/locations                      -> {"countries":[...]}
//! GET /api/v1/locations?countryId=1          -> {"states":[...]}
//! GET /api/v1/locations?countryId=1&stateId=2 -> {"cities":[...]}
//! ```

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::domain::{Error, LocationSourceError};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Query parameters selecting the cascade level.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    /// Narrows the lookup to the states of one country.
    pub country_id: Option<String>,
    /// Narrows the lookup to the cities of one state; requires `countryId`.
    pub state_id: Option<String>,
}

fn map_source_error(error: LocationSourceError) -> Error {
    warn!(error = %error, "location lookup failed");
    Error::service_unavailable("location service unavailable")
}

/// List countries, states of a country, or cities of a state.
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    params(LocationQuery),
    responses(
        (status = 200, description = "One cascade level, keyed `countries`, `states`, or `cities`, each a list of `LocationEntry`"),
        (status = 400, description = "stateId without countryId", body = Error),
        (status = 503, description = "Location service unavailable", body = Error)
    ),
    tags = ["locations"],
    operation_id = "listLocations",
    security([])
)]
#[get("/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    query: web::Query<LocationQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let body = match (query.country_id, query.state_id) {
        (None, None) => {
            let countries = state
                .locations
                .list_countries()
                .await
                .map_err(map_source_error)?;
            json!({ "countries": countries })
        }
        (Some(country_id), None) => {
            let states = state
                .locations
                .list_states(&country_id)
                .await
                .map_err(map_source_error)?;
            json!({ "states": states })
        }
        (Some(country_id), Some(state_id)) => {
            let cities = state
                .locations
                .list_cities(&country_id, &state_id)
                .await
                .map_err(map_source_error)?;
            json!({ "cities": cities })
        }
        (None, Some(_)) => {
            return Err(Error::invalid_request("stateId requires countryId"));
        }
    };
    Ok(HttpResponse::Ok().json(body))
}
