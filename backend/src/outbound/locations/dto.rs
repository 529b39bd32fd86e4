//! DTOs for decoding location API responses.
//!
//! The upstream API is loose about identifier types: some deployments emit
//! numeric ids, others strings. The adapter decodes either and normalises to
//! strings before mapping into domain entries.

use serde::Deserialize;

use crate::domain::LocationEntry;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum IdDto {
    Number(i64),
    Text(String),
}

impl IdDto {
    fn into_string(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationEntryDto {
    pub(super) id: IdDto,
    pub(super) name: String,
}

impl LocationEntryDto {
    pub(super) fn into_domain(self) -> LocationEntry {
        LocationEntry {
            id: self.id.into_string(),
            name: self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CountriesDto {
    #[serde(default)]
    pub(super) countries: Vec<LocationEntryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatesDto {
    #[serde(default)]
    pub(super) states: Vec<LocationEntryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CitiesDto {
    #[serde(default)]
    pub(super) cities: Vec<LocationEntryDto>,
}
