//! Consolidated form validation.
//!
//! One canonical schema per form, sharing field rules instead of the
//! copy-pasted validators the flows accumulated over time. Violations
//! accumulate into a field-keyed map of human-readable messages and the
//! submission is rejected as a whole; nothing is persisted when any field
//! fails.
//!
//! Canonical rules where revisions diverged: phone numbers are exactly ten
//! ASCII digits everywhere.

use std::collections::BTreeMap;

use serde_json::json;

use super::account::AccountType;
use super::error::Error;
use super::voucher::{Denomination, PhotoUpload, ALLOWED_PHOTO_MIME, MAX_PHOTO_BYTES};

/// Field-keyed validation messages.
///
/// Keys are form field names; each carries one or more human-readable
/// messages. `BTreeMap` keeps the serialised order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Start an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    /// True when no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Finish validation: `Ok` when clean, otherwise an
    /// [`Error::invalid_request`] carrying the field map as details.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_request("validation failed")
                .with_details(json!({ "fieldErrors": self.0 })))
        }
    }
}

fn check_name(errors: &mut FieldErrors, name: &str) {
    if name.trim().chars().count() < 2 {
        errors.push("name", "Name must be at least 2 characters");
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if !is_plausible_email(email) {
        errors.push("email", "Invalid email address");
    }
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain,
/// no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn check_phone(errors: &mut FieldErrors, phone: &str) {
    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        errors.push("phone", "Phone number must be exactly 10 digits");
    }
}

fn check_address(errors: &mut FieldErrors, address: &str) {
    if address.trim().chars().count() < 5 {
        errors.push("address", "Address must be at least 5 characters");
    }
}

fn check_selection(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("Please select a {label}"));
    }
}

fn check_amount(errors: &mut FieldErrors, amount: u32) {
    if Denomination::new(amount).is_err() {
        errors.push("amount", "Amount must be one of the fixed denominations");
    }
}

fn check_business_tin(errors: &mut FieldErrors, tin: &str) {
    let digits_only = tin.bytes().all(|b| b.is_ascii_digit());
    if !(8..=15).contains(&tin.len()) || !digits_only {
        errors.push("businessTin", "Business TIN must be an 8-15 digit number");
    }
}

fn check_photo(errors: &mut FieldErrors, photo: &PhotoUpload) {
    if photo.bytes.len() > MAX_PHOTO_BYTES {
        errors.push("idPhoto", "ID photo must be at most 5MB");
    }
    if !ALLOWED_PHOTO_MIME.contains(&photo.content_type.as_str()) {
        errors.push("idPhoto", "ID photo must be a JPEG, PNG, or WebP image");
    }
}

/// Bank-account signup submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupForm {
    /// Full name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Selected city.
    pub city: String,
    /// Selected state.
    pub state: String,
    /// Account product; defaults to savings when unset.
    pub account_type: Option<AccountType>,
    /// Opening deposit.
    pub initial_deposit: i64,
    /// Partner-bank affiliation tag from the bank page, if any.
    pub bank: Option<String>,
    /// Terms and conditions acceptance.
    pub terms: bool,
}

impl SignupForm {
    /// Validate the whole submission, accumulating every violation.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, &self.email);
        check_phone(&mut errors, &self.phone);
        check_address(&mut errors, &self.address);
        check_selection(&mut errors, "city", &self.city, "city");
        check_selection(&mut errors, "state", &self.state, "state");
        if self.initial_deposit < 0 {
            errors.push("initialDeposit", "Initial deposit must be a positive number");
        }
        if !self.terms {
            errors.push("terms", "You must accept the terms and conditions");
        }
        errors.into_result()
    }
}

/// Voucher request from a first-time participant.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVoucherForm {
    /// Requester name.
    pub name: String,
    /// Selected country name.
    pub country: String,
    /// Selected state name.
    pub state: String,
    /// Selected city name.
    pub city: String,
    /// Requester phone number.
    pub phone: String,
    /// Requested amount.
    pub amount: u32,
    /// Business taxpayer identification number.
    pub business_tin: String,
    /// Optional ID photo.
    pub id_photo: Option<PhotoUpload>,
}

impl NewVoucherForm {
    /// Validate the whole submission, accumulating every violation.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.name);
        check_selection(&mut errors, "country", &self.country, "country");
        check_selection(&mut errors, "state", &self.state, "state");
        check_selection(&mut errors, "city", &self.city, "city");
        check_phone(&mut errors, &self.phone);
        check_amount(&mut errors, self.amount);
        check_business_tin(&mut errors, &self.business_tin);
        if let Some(photo) = &self.id_photo {
            check_photo(&mut errors, photo);
        }
        errors.into_result()
    }
}

/// Voucher request from a previously registered participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingVoucherForm {
    /// Phone number the prior voucher was registered under.
    pub phone: String,
    /// Requested amount.
    pub amount: u32,
}

impl ExistingVoucherForm {
    /// Validate the whole submission, accumulating every violation.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = FieldErrors::new();
        check_phone(&mut errors, &self.phone);
        check_amount(&mut errors, self.amount);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn valid_signup() -> SignupForm {
        SignupForm {
            name: "Abebe Bikila".into(),
            email: "abebe@example.com".into(),
            phone: "0911223344".into(),
            address: "Bole Road 12".into(),
            city: "addis-ababa".into(),
            state: "addis-ababa".into(),
            account_type: None,
            initial_deposit: 100,
            bank: Some("coop".into()),
            terms: true,
        }
    }

    fn valid_new_voucher() -> NewVoucherForm {
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

    fn field_errors(error: crate::domain::Error) -> serde_json::Value {
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        error
            .details()
            .and_then(|details| details.get("fieldErrors"))
            .cloned()
            .expect("field errors present")
    }

    #[test]
    fn valid_forms_pass() {
        valid_signup().validate().expect("signup valid");
        valid_new_voucher().validate().expect("voucher valid");
        ExistingVoucherForm { phone: "0911223344".into(), amount: 50 }
            .validate()
            .expect("existing valid");
    }

    #[rstest]
    #[case::short_name(|f: &mut SignupForm| f.name = "A".into(), "name")]
    #[case::bad_email(|f: &mut SignupForm| f.email = "not-an-email".into(), "email")]
    #[case::short_phone(|f: &mut SignupForm| f.phone = "12345".into(), "phone")]
    #[case::long_phone(|f: &mut SignupForm| f.phone = "09112233445".into(), "phone")]
    #[case::letter_phone(|f: &mut SignupForm| f.phone = "09112233xx".into(), "phone")]
    #[case::short_address(|f: &mut SignupForm| f.address = "Bole".into(), "address")]
    #[case::no_city(|f: &mut SignupForm| f.city = String::new(), "city")]
    #[case::no_state(|f: &mut SignupForm| f.state = "  ".into(), "state")]
    #[case::negative_deposit(|f: &mut SignupForm| f.initial_deposit = -1, "initialDeposit")]
    #[case::terms_unchecked(|f: &mut SignupForm| f.terms = false, "terms")]
    fn signup_violations_name_the_field(
        #[case] mutate: fn(&mut SignupForm),
        #[case] field: &str,
    ) {
        let mut form = valid_signup();
        mutate(&mut form);
        let error = form.validate().expect_err("violation rejected");
        let errors = field_errors(error);
        assert!(errors.get(field).is_some(), "expected violation on {field}");
    }

    #[rstest]
    #[case::off_menu_amount(|f: &mut NewVoucherForm| f.amount = 42, "amount")]
    #[case::short_tin(|f: &mut NewVoucherForm| f.business_tin = "1234567".into(), "businessTin")]
    #[case::long_tin(|f: &mut NewVoucherForm| f.business_tin = "1234567890123456".into(), "businessTin")]
    #[case::alpha_tin(|f: &mut NewVoucherForm| f.business_tin = "1234abcd".into(), "businessTin")]
    #[case::no_country(|f: &mut NewVoucherForm| f.country = String::new(), "country")]
    fn new_voucher_violations_name_the_field(
        #[case] mutate: fn(&mut NewVoucherForm),
        #[case] field: &str,
    ) {
        let mut form = valid_new_voucher();
        mutate(&mut form);
        let error = form.validate().expect_err("violation rejected");
        let errors = field_errors(error);
        assert!(errors.get(field).is_some(), "expected violation on {field}");
    }

    #[test]
    fn oversized_photo_is_rejected() {
        let mut form = valid_new_voucher();
        form.id_photo = Some(PhotoUpload {
            file_name: "id.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0; MAX_PHOTO_BYTES + 1],
        });
        let error = form.validate().expect_err("oversized photo rejected");
        assert!(field_errors(error).get("idPhoto").is_some());
    }

    #[test]
    fn wrong_mime_photo_is_rejected() {
        let mut form = valid_new_voucher();
        form.id_photo = Some(PhotoUpload {
            file_name: "id.gif".into(),
            content_type: "image/gif".into(),
            bytes: vec![0; 16],
        });
        let error = form.validate().expect_err("wrong mime rejected");
        assert!(field_errors(error).get("idPhoto").is_some());
    }

    #[test]
    fn violations_accumulate_across_fields() {
        let mut form = valid_signup();
        form.name = "A".into();
        form.terms = false;
        let error = form.validate().expect_err("both violations rejected");
        let errors = field_errors(error);
        assert!(errors.get("name").is_some());
        assert!(errors.get("terms").is_some());
    }

    #[rstest]
    #[case("abebe@example.com", true)]
    #[case("a@b.co", true)]
    #[case("no-at-sign", false)]
    #[case("@example.com", false)]
    #[case("a@nodot", false)]
    #[case("a b@example.com", false)]
    #[case("a@.com", false)]
    fn email_plausibility(#[case] email: &str, #[case] expected: bool) {
        assert_eq!(is_plausible_email(email), expected);
    }
}
