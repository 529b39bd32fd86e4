//! Authentication helpers used by HTTP handlers.
//!
//! The export endpoints are gated by a single shared secret configured on
//! the server. Keeping the comparison here concentrates the credential
//! check in one place.

use crate::domain::Error;

use super::ApiResult;

/// Check a submitted export password against the configured secret.
pub fn verify_export_password(provided: &str, expected: &str) -> ApiResult<()> {
    if !expected.is_empty() && provided == expected {
        Ok(())
    } else {
        Err(Error::unauthorized("invalid password"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("s3cret", "s3cret", true)]
    #[case("wrong", "s3cret", false)]
    #[case("", "s3cret", false)]
    #[case("", "", false)]
    fn checks_the_shared_secret(
        #[case] provided: &str,
        #[case] expected: &str,
        #[case] ok: bool,
    ) {
        let result = verify_export_password(provided, expected);
        if ok {
            assert!(result.is_ok());
        } else {
            assert_eq!(result.expect_err("rejected").code(), ErrorCode::Unauthorized);
        }
    }
}
