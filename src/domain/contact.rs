use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::common::{EntryId, Identifiable};

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone number pattern compiles"));

/// Ten digits, no punctuation.
pub fn is_valid_phone_number(value: &str) -> bool {
    PHONE_NUMBER.is_match(value)
}

/// An extra labelled phone number (e.g. "Fax", "Hotline").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactNumberEntry {
    pub id: EntryId,
    pub label: String,
    pub number: String,
}

impl Identifiable for ContactNumberEntry {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Input values for a new contact number, owned by the editor's caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub label: String,
    pub number: String,
}

impl ContactDraft {
    pub fn new(label: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            number: number.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers_are_exactly_ten_digits() {
        assert!(is_valid_phone_number("5551234567"));
        assert!(!is_valid_phone_number("12345"));
        assert!(!is_valid_phone_number("555-123-4567"));
        assert!(!is_valid_phone_number("55512345678"));
    }
}
