//! Voucher issuance API handler.
//!
//! The endpoint accepts `multipart/form-data` with a JSON `payload` part
//! carrying the request fields and an optional `idPhoto` file part. The
//! payload is tagged by requester kind:
//!
//! ```text
//! POST /api/v1/vouchers
//!   payload: {"kind":"newUser","name":"...","phone":"0911223344",...}
//!   idPhoto: <binary> (optional)
//! ```

use actix_multipart::form::{bytes::Bytes as MultipartBytes, json::Json as MultipartJson, MultipartForm};
use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, ExistingVoucherForm, NewVoucherForm, PhotoUpload, VoucherReceipt, VoucherRequest,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// JSON `payload` part of the multipart request, tagged by requester kind.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VoucherRequestDto {
    /// First-time participant with full details.
    #[serde(rename_all = "camelCase")]
    NewUser {
        name: String,
        country: String,
        state: String,
        city: String,
        phone: String,
        amount: u32,
        business_tin: String,
    },
    /// Previously registered participant.
    #[serde(rename_all = "camelCase")]
    ExistingUser { phone: String, amount: u32 },
}

/// Multipart envelope: the JSON payload plus the optional ID photo.
#[derive(Debug, MultipartForm)]
pub struct VoucherSubmission {
    #[multipart(limit = "64KiB")]
    pub payload: MultipartJson<VoucherRequestDto>,
    // Limit above the domain maximum so the size rule produces a field
    // error instead of a blunt 400.
    #[multipart(rename = "idPhoto", limit = "8MiB")]
    pub id_photo: Option<MultipartBytes>,
}

/// Issuance receipt for `POST /api/v1/vouchers`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoucherReceiptDto {
    pub amount: u32,
    pub coin_token: String,
}

impl From<VoucherReceipt> for VoucherReceiptDto {
    fn from(receipt: VoucherReceipt) -> Self {
        Self {
            amount: receipt.amount,
            coin_token: receipt.coin_token,
        }
    }
}

fn photo_from_part(part: MultipartBytes) -> PhotoUpload {
    PhotoUpload {
        file_name: part.file_name.unwrap_or_else(|| "photo".to_owned()),
        content_type: part
            .content_type
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_owned()),
        bytes: part.data.to_vec(),
    }
}

fn into_request(dto: VoucherRequestDto, id_photo: Option<MultipartBytes>) -> VoucherRequest {
    match dto {
        VoucherRequestDto::NewUser {
            name,
            country,
            state,
            city,
            phone,
            amount,
            business_tin,
        } => VoucherRequest::NewUser(NewVoucherForm {
            name,
            country,
            state,
            city,
            phone,
            amount,
            business_tin,
            id_photo: id_photo.map(photo_from_part),
        }),
        // The existing-user branch reuses the photo stored with the prior
        // voucher; a stray file part is ignored.
        VoucherRequestDto::ExistingUser { phone, amount } => {
            VoucherRequest::ExistingUser(ExistingVoucherForm { phone, amount })
        }
    }
}

/// Issue a digital-money voucher.
#[utoipa::path(
    post,
    path = "/api/v1/vouchers",
    responses(
        (status = 201, description = "Voucher issued", body = VoucherReceiptDto),
        (status = 400, description = "Validation failed", body = Error),
        (status = 404, description = "No prior voucher for this phone", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Upstream unavailable", body = Error)
    ),
    tags = ["vouchers"],
    operation_id = "issueVoucher",
    security([])
)]
#[post("/vouchers")]
pub async fn issue_voucher(
    state: web::Data<HttpState>,
    MultipartForm(submission): MultipartForm<VoucherSubmission>,
) -> ApiResult<HttpResponse> {
    let request = into_request(submission.payload.into_inner(), submission.id_photo);
    let receipt = state.vouchers.issue(request).await?;
    Ok(HttpResponse::Created().json(VoucherReceiptDto::from(receipt)))
}
