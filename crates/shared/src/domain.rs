use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Synthetic category that selects every item. Never sent by the backend.
pub const ALL_CATEGORIES: &str = "Semua";

pub const GUESTS_MIN: u32 = 1;
pub const GUESTS_MAX: u32 = 20;
pub const DEFAULT_GUESTS: u32 = 2;

/// One entry of the café menu as returned by `GET /api/menu`.
///
/// Items carry no stable id; their position in the received list is their identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
}

impl MenuItem {
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// Editable fields of a reservation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    FullName,
    Phone,
    Email,
    Guests,
    Date,
    Time,
    Notes,
}

impl DraftField {
    pub const REQUIRED: [DraftField; 5] = [
        DraftField::FullName,
        DraftField::Phone,
        DraftField::Guests,
        DraftField::Date,
        DraftField::Time,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::FullName => "full_name",
            DraftField::Phone => "phone",
            DraftField::Email => "email",
            DraftField::Guests => "guests",
            DraftField::Date => "date",
            DraftField::Time => "time",
            DraftField::Notes => "notes",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable reservation record owned by one form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    #[serde(alias = "name")]
    pub full_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub guests: u32,
    pub date: String,
    pub time: String,
    #[serde(default, alias = "message")]
    pub notes: String,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            email: None,
            guests: DEFAULT_GUESTS,
            date: String::new(),
            time: String::new(),
            notes: String::new(),
        }
    }
}

impl ReservationDraft {
    /// Writes a raw input value into `field`.
    ///
    /// The guest count is coerced to an integer; anything unparsable becomes `0`,
    /// which then reports as missing. Negative counts cannot be carried and are
    /// treated as missing too. An empty email clears it.
    pub fn set_field(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::FullName => self.full_name = value.to_string(),
            DraftField::Phone => self.phone = value.to_string(),
            DraftField::Email => {
                self.email = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            DraftField::Guests => self.guests = coerce_guests(value),
            DraftField::Date => self.date = value.to_string(),
            DraftField::Time => self.time = value.to_string(),
            DraftField::Notes => self.notes = value.to_string(),
        }
    }

    pub fn missing_fields(&self) -> Vec<DraftField> {
        DraftField::REQUIRED
            .into_iter()
            .filter(|field| match field {
                DraftField::FullName => self.full_name.trim().is_empty(),
                DraftField::Phone => self.phone.trim().is_empty(),
                DraftField::Guests => self.guests == 0,
                DraftField::Date => self.date.trim().is_empty(),
                DraftField::Time => self.time.trim().is_empty(),
                DraftField::Email | DraftField::Notes => false,
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn coerce_guests(value: &str) -> u32 {
    let value = value.trim();
    if let Ok(parsed) = value.parse::<u32>() {
        return parsed;
    }
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => parsed.trunc() as u32,
        _ => 0,
    }
}
