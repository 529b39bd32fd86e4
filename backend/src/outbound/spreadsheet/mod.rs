//! Workbook rendering for the admin user export.
//!
//! Renders the filtered user records into an `.xlsx` workbook held in
//! memory; the HTTP adapter streams the buffer back as an attachment.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::UserRecord;

const COLUMNS: [&str; 6] = ["Name", "Email", "Phone", "City", "Address", "Bank"];

// Excel rejects worksheet names longer than 31 characters.
const MAX_SHEET_NAME: usize = 31;

fn sheet_name(city: &str, bank: &str) -> String {
    format!("{city} {bank}")
        .chars()
        .take(MAX_SHEET_NAME)
        .collect()
}

/// Download file name for one city and bank filter pair.
pub fn export_file_name(city: &str, bank: &str) -> String {
    format!("user_data_{city}_{bank}.xlsx")
}

/// Render the records into an in-memory `.xlsx` workbook.
pub fn render_user_workbook(
    records: &[UserRecord],
    city: &str,
    bank: &str,
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name(city, bank))?;

    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        sheet.write_string(row, 0, &record.name)?;
        sheet.write_string(row, 1, &record.email)?;
        sheet.write_string(row, 2, &record.phone)?;
        sheet.write_string(row, 3, &record.city)?;
        sheet.write_string(row, 4, &record.address)?;
        sheet.write_string(row, 5, record.bank.as_deref().unwrap_or(""))?;
    }

    workbook.save_to_buffer()
}
