//! User-export workflow service.
//!
//! A read-only equality query over persisted users, filtered by city and
//! bank affiliation. Rendering into a workbook is left to the spreadsheet
//! adapter; this service only returns the matching records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use super::account::UserRecord;
use super::error::Error;
use super::ports::{ExportPersistenceError, UserExportRepository, UsersExport};

fn map_persistence_error(error: ExportPersistenceError) -> Error {
    match error {
        ExportPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("export store unavailable: {message}"))
        }
        ExportPersistenceError::Query { message } => {
            Error::internal(format!("export query failed: {message}"))
        }
    }
}

/// Export service implementing the [`UsersExport`] driving port.
#[derive(Clone)]
pub struct ExportService<R> {
    repo: Arc<R>,
}

impl<R> ExportService<R> {
    /// Create a new service with the export repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> UsersExport for ExportService<R>
where
    R: UserExportRepository,
{
    async fn export_users(&self, city: &str, bank: &str) -> Result<Vec<UserRecord>, Error> {
        self.repo
            .find_by_city_and_bank(city, bank)
            .await
            .map_err(|err| {
                error!(error = %err, city, bank, "user export query failed");
                map_persistence_error(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use uuid::Uuid;

    struct InMemoryExportRepository {
        rows: Vec<UserRecord>,
    }

    #[async_trait]
    impl UserExportRepository for InMemoryExportRepository {
        async fn find_by_city_and_bank(
            &self,
            city: &str,
            bank: &str,
        ) -> Result<Vec<UserRecord>, ExportPersistenceError> {
            Ok(self
                .rows
                .iter()
                .filter(|row| row.city == city && row.bank.as_deref() == Some(bank))
                .cloned()
                .collect())
        }
    }

    fn record(name: &str, city: &str, bank: Option<&str>) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "0911000000".to_owned(),
            city: city.to_owned(),
            address: "Somewhere 1".to_owned(),
            bank: bank.map(str::to_owned),
        }
    }

    #[rstest]
    fn returns_exactly_the_equality_matches() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryExportRepository {
                rows: vec![
                    record("Alem", "addis-ababa", Some("coop")),
                    record("Biruk", "addis-ababa", Some("awash")),
                    record("Chaltu", "adama", Some("coop")),
                    record("Dawit", "addis-ababa", Some("coop")),
                    record("Eyob", "addis-ababa", None),
                ],
            });
            let service = ExportService::new(repo);

            let records = service
                .export_users("addis-ababa", "coop")
                .await
                .expect("query succeeds");

            let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["Alem", "Dawit"]);
        });
    }

    #[rstest]
    fn empty_match_set_is_not_an_error() {
        actix_rt::System::new().block_on(async {
            let repo = Arc::new(InMemoryExportRepository { rows: Vec::new() });
            let service = ExportService::new(repo);

            let records = service.export_users("adama", "nib").await.expect("query");
            assert!(records.is_empty());
        });
    }

    struct FailingExportRepository(ExportPersistenceError);

    #[async_trait]
    impl UserExportRepository for FailingExportRepository {
        async fn find_by_city_and_bank(
            &self,
            _city: &str,
            _bank: &str,
        ) -> Result<Vec<UserRecord>, ExportPersistenceError> {
            Err(self.0.clone())
        }
    }

    #[rstest]
    #[case(ExportPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(ExportPersistenceError::query("syntax"), ErrorCode::InternalError)]
    fn persistence_failures_map_to_generic_errors(
        #[case] failure: ExportPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        actix_rt::System::new().block_on(async {
            let service = ExportService::new(Arc::new(FailingExportRepository(failure)));
            let error = service
                .export_users("addis-ababa", "coop")
                .await
                .expect_err("failure surfaced");
            assert_eq!(error.code(), expected);
        });
    }
}
