//! Voucher-issuance workflow service.
//!
//! Issuance validates first, uploads the ID photo (when present) before any
//! row is written, then inserts the voucher with a freshly generated token.
//! Token uniqueness is enforced by the storage layer; on conflict the
//! service regenerates and retries a bounded number of times.
//!
//! Duplicate submissions are NOT deduplicated: the same request issued
//! twice creates two rows with two distinct tokens.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::error::Error;
use super::ports::{
    DigitalCoinRepository, PhotoStore, PhotoStoreError, VoucherIssuer, VoucherPersistenceError,
    VoucherRequest,
};
use super::voucher::{CoinToken, Denomination, NewDigitalCoin, VoucherReceipt};
use uuid::Uuid;

/// Upper bound on token regeneration after storage conflicts.
const MAX_TOKEN_ATTEMPTS: u32 = 5;
/// Upload-store folder receiving voucher ID photos.
const PHOTO_FOLDER: &str = "id-photos";

fn map_persistence_error(error: VoucherPersistenceError) -> Error {
    match error {
        VoucherPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("voucher store unavailable: {message}"))
        }
        VoucherPersistenceError::Write { message } => {
            Error::internal(format!("voucher write failed: {message}"))
        }
        VoucherPersistenceError::TokenConflict => {
            Error::internal("coin token conflict outside the retry loop")
        }
    }
}

fn map_photo_error(error: PhotoStoreError) -> Error {
    Error::service_unavailable(format!("ID photo upload failed: {error}"))
}

/// Identity fields of a voucher row, separated from the generated parts.
struct CoinDraft {
    name: String,
    country: String,
    state: String,
    city: String,
    amount: Denomination,
    generator_phone_number: String,
    id_photo_url: Option<String>,
}

/// Voucher service implementing the [`VoucherIssuer`] driving port.
#[derive(Clone)]
pub struct VoucherService<R, P> {
    coins: Arc<R>,
    photos: Arc<P>,
}

impl<R, P> VoucherService<R, P> {
    /// Create a new service with the voucher repository and photo store.
    pub fn new(coins: Arc<R>, photos: Arc<P>) -> Self {
        Self { coins, photos }
    }
}

impl<R, P> VoucherService<R, P>
where
    R: DigitalCoinRepository,
    P: PhotoStore,
{
    /// Insert the draft with a fresh token, regenerating on conflict.
    async fn insert_with_fresh_token(&self, draft: CoinDraft) -> Result<VoucherReceipt, Error> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            // ThreadRng is not Send; scope it away from the await below.
            let token = {
                let mut rng = rand::thread_rng();
                CoinToken::generate(&mut rng)
            };
            let coin = NewDigitalCoin {
                id: Uuid::new_v4(),
                name: draft.name.clone(),
                country: draft.country.clone(),
                state: draft.state.clone(),
                city: draft.city.clone(),
                amount: draft.amount,
                generator_phone_number: draft.generator_phone_number.clone(),
                id_photo_url: draft.id_photo_url.clone(),
                coin_token: token.clone(),
            };

            match self.coins.insert(&coin).await {
                Ok(()) => {
                    info!(coin_id = %coin.id, amount = draft.amount.value(), "voucher issued");
                    return Ok(VoucherReceipt {
                        amount: draft.amount.value(),
                        coin_token: token.as_str().to_owned(),
                    });
                }
                Err(VoucherPersistenceError::TokenConflict) => {
                    warn!(attempt, "coin token collision, regenerating");
                }
                Err(other) => {
                    error!(error = %other, "voucher persistence failed");
                    return Err(map_persistence_error(other));
                }
            }
        }

        error!(attempts = MAX_TOKEN_ATTEMPTS, "exhausted coin token attempts");
        Err(Error::internal("could not allocate a unique coin token"))
    }
}

#[async_trait]
impl<R, P> VoucherIssuer for VoucherService<R, P>
where
    R: DigitalCoinRepository,
    P: PhotoStore,
{
    async fn issue(&self, request: VoucherRequest) -> Result<VoucherReceipt, Error> {
        match request {
            VoucherRequest::NewUser(form) => {
                form.validate()?;
                // The upload must complete and yield a URL before any row
                // is written; an upload failure aborts the issuance.
                let id_photo_url = match &form.id_photo {
                    Some(photo) => Some(
                        self.photos
                            .store(photo, PHOTO_FOLDER)
                            .await
                            .map_err(|err| {
                                error!(error = %err, "ID photo upload failed");
                                map_photo_error(err)
                            })?,
                    ),
                    None => None,
                };
                let amount = Denomination::new(form.amount)
                    .map_err(|err| Error::invalid_request(err.to_string()))?;
                self.insert_with_fresh_token(CoinDraft {
                    name: form.name,
                    country: form.country,
                    state: form.state,
                    city: form.city,
                    amount,
                    generator_phone_number: form.phone,
                    id_photo_url,
                })
                .await
            }
            VoucherRequest::ExistingUser(form) => {
                form.validate()?;
                let prior = self
                    .coins
                    .find_latest_by_phone(&form.phone)
                    .await
                    .map_err(|err| {
                        error!(error = %err, "voucher lookup failed");
                        map_persistence_error(err)
                    })?
                    .ok_or_else(|| {
                        Error::not_found("no digital coin is registered for this phone number")
                    })?;
                let amount = Denomination::new(form.amount)
                    .map_err(|err| Error::invalid_request(err.to_string()))?;
                self.insert_with_fresh_token(CoinDraft {
                    name: prior.name,
                    country: prior.country,
                    state: prior.state,
                    city: prior.city,
                    amount,
                    generator_phone_number: form.phone,
                    id_photo_url: prior.id_photo_url,
                })
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::{ExistingVoucherForm, NewVoucherForm};
    use crate::domain::voucher::{DigitalCoin, PhotoUpload};
    use crate::domain::ErrorCode;
    use chrono::Utc;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryCoinRepository {
        rows: Mutex<Vec<DigitalCoin>>,
        conflicts_remaining: AtomicU32,
        fail_with: Mutex<Option<VoucherPersistenceError>>,
    }

    impl InMemoryCoinRepository {
        fn with_conflicts(count: u32) -> Self {
            let repo = Self::default();
            repo.conflicts_remaining.store(count, Ordering::SeqCst);
            repo
        }

        fn rows(&self) -> Vec<DigitalCoin> {
            self.rows.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl DigitalCoinRepository for InMemoryCoinRepository {
        async fn insert(&self, coin: &NewDigitalCoin) -> Result<(), VoucherPersistenceError> {
            if let Some(err) = self.fail_with.lock().expect("lock").take() {
                return Err(err);
            }
            if self
                .conflicts_remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(VoucherPersistenceError::TokenConflict);
            }
            self.rows.lock().expect("lock").push(DigitalCoin {
                id: coin.id,
                name: coin.name.clone(),
                country: coin.country.clone(),
                state: coin.state.clone(),
                city: coin.city.clone(),
                amount: coin.amount,
                generator_phone_number: coin.generator_phone_number.clone(),
                id_photo_url: coin.id_photo_url.clone(),
                coin_token: coin.coin_token.clone(),
                created_at: Utc::now(),
            });
            Ok(())
        }

        async fn find_latest_by_phone(
            &self,
            phone: &str,
        ) -> Result<Option<DigitalCoin>, VoucherPersistenceError> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .filter(|row| row.generator_phone_number == phone)
                .max_by_key(|row| row.created_at)
                .cloned())
        }
    }

    #[derive(Default)]
    struct StubPhotoStore {
        uploads: AtomicU32,
        fail: bool,
    }

    impl StubPhotoStore {
        fn failing() -> Self {
            Self { uploads: AtomicU32::new(0), fail: true }
        }
    }

    #[async_trait]
    impl PhotoStore for StubPhotoStore {
        async fn store(
            &self,
            photo: &PhotoUpload,
            folder: &str,
        ) -> Result<String, PhotoStoreError> {
            if self.fail {
                return Err(PhotoStoreError::transport("connection reset"));
            }
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://cdn.example/{folder}/{}", photo.file_name))
        }
    }

    fn new_user_form() -> NewVoucherForm {
        NewVoucherForm {
            name: "Abebe Bikila".into(),
            country: "Ethiopia".into(),
            state: "Oromia".into(),
            city: "Adama".into(),
            phone: "0911223344".into(),
            amount: 500,
            business_tin: "12345678".into(),
            id_photo: None,
        }
    }

    fn service(
        repo: Arc<InMemoryCoinRepository>,
        photos: Arc<StubPhotoStore>,
    ) -> VoucherService<InMemoryCoinRepository, StubPhotoStore> {
        VoucherService::new(repo, photos)
    }

    #[rstest]
    fn new_user_issuance_creates_one_row_with_valid_token() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::default());
            let svc = service(Arc::clone(&repo), Arc::new(StubPhotoStore::default()));

            let receipt = svc
                .issue(VoucherRequest::NewUser(new_user_form()))
                .await
                .expect("issued");

            assert_eq!(receipt.amount, 500);
            assert!(CoinToken::parse(&receipt.coin_token).is_ok());
            let rows = repo.rows();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].generator_phone_number, "0911223344");
            assert_eq!(rows[0].id_photo_url, None);
        });
    }

    #[rstest]
    fn photo_url_is_stored_instead_of_bytes() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::default());
            let photos = Arc::new(StubPhotoStore::default());
            let svc = service(Arc::clone(&repo), Arc::clone(&photos));

            let mut form = new_user_form();
            form.id_photo = Some(PhotoUpload {
                file_name: "id.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0xFF; 64],
            });
            svc.issue(VoucherRequest::NewUser(form)).await.expect("issued");

            assert_eq!(photos.uploads.load(Ordering::SeqCst), 1);
            let rows = repo.rows();
            assert_eq!(
                rows[0].id_photo_url.as_deref(),
                Some("https://cdn.example/id-photos/id.jpg")
            );
        });
    }

    #[rstest]
    fn failed_upload_aborts_before_any_row_is_written() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::default());
            let svc = service(Arc::clone(&repo), Arc::new(StubPhotoStore::failing()));

            let mut form = new_user_form();
            form.id_photo = Some(PhotoUpload {
                file_name: "id.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0xFF; 64],
            });
            let error = svc
                .issue(VoucherRequest::NewUser(form))
                .await
                .expect_err("upload failure surfaced");

            assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
            assert!(repo.rows().is_empty());
        });
    }

    #[rstest]
    fn existing_user_with_no_prior_row_fails_not_found() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::default());
            let svc = service(Arc::clone(&repo), Arc::new(StubPhotoStore::default()));

            let error = svc
                .issue(VoucherRequest::ExistingUser(ExistingVoucherForm {
                    phone: "0911223344".into(),
                    amount: 100,
                }))
                .await
                .expect_err("no prior row");

            assert_eq!(error.code(), ErrorCode::NotFound);
            assert!(repo.rows().is_empty());
        });
    }

    #[rstest]
    fn existing_user_copies_identity_fields_with_fresh_token() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::default());
            let photos = Arc::new(StubPhotoStore::default());
            let svc = service(Arc::clone(&repo), Arc::clone(&photos));

            let mut form = new_user_form();
            form.id_photo = Some(PhotoUpload {
                file_name: "id.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0xFF; 64],
            });
            let first = svc.issue(VoucherRequest::NewUser(form)).await.expect("issued");

            let second = svc
                .issue(VoucherRequest::ExistingUser(ExistingVoucherForm {
                    phone: "0911223344".into(),
                    amount: 1000,
                }))
                .await
                .expect("reissued");

            assert_eq!(second.amount, 1000);
            assert_ne!(second.coin_token, first.coin_token);

            let rows = repo.rows();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].name, rows[0].name);
            assert_eq!(rows[1].country, rows[0].country);
            assert_eq!(rows[1].state, rows[0].state);
            assert_eq!(rows[1].city, rows[0].city);
            assert_eq!(rows[1].id_photo_url, rows[0].id_photo_url);
            assert_eq!(rows[1].amount.value(), 1000);
            // No photo re-upload for existing users.
            assert_eq!(photos.uploads.load(Ordering::SeqCst), 1);
        });
    }

    #[rstest]
    fn token_conflicts_regenerate_until_insert_succeeds() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::with_conflicts(2));
            let svc = service(Arc::clone(&repo), Arc::new(StubPhotoStore::default()));

            svc.issue(VoucherRequest::NewUser(new_user_form()))
                .await
                .expect("eventually issued");
            assert_eq!(repo.rows().len(), 1);
        });
    }

    #[rstest]
    fn exhausted_token_attempts_surface_internal_error() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::with_conflicts(u32::MAX));
            let svc = service(Arc::clone(&repo), Arc::new(StubPhotoStore::default()));

            let error = svc
                .issue(VoucherRequest::NewUser(new_user_form()))
                .await
                .expect_err("attempts exhausted");
            assert_eq!(error.code(), ErrorCode::InternalError);
            assert!(repo.rows().is_empty());
        });
    }

    #[rstest]
    fn duplicate_submissions_create_two_rows_with_distinct_tokens() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::default());
            let svc = service(Arc::clone(&repo), Arc::new(StubPhotoStore::default()));

            let first = svc
                .issue(VoucherRequest::NewUser(new_user_form()))
                .await
                .expect("first");
            let second = svc
                .issue(VoucherRequest::NewUser(new_user_form()))
                .await
                .expect("second");

            assert_ne!(first.coin_token, second.coin_token);
            assert_eq!(repo.rows().len(), 2);
        });
    }

    #[rstest]
    fn invalid_new_user_form_is_rejected_before_side_effects() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryCoinRepository::default());
            let photos = Arc::new(StubPhotoStore::default());
            let svc = service(Arc::clone(&repo), Arc::clone(&photos));

            let mut form = new_user_form();
            form.amount = 42;
            form.id_photo = Some(PhotoUpload {
                file_name: "id.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0xFF; 64],
            });
            let error = svc
                .issue(VoucherRequest::NewUser(form))
                .await
                .expect_err("rejected");

            assert_eq!(error.code(), ErrorCode::InvalidRequest);
            assert_eq!(photos.uploads.load(Ordering::SeqCst), 0);
            assert!(repo.rows().is_empty());
        });
    }
}
