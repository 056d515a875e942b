use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::ReservationDraft;

/// Field naming used when posting a reservation.
///
/// The two storefront pages disagree on the backend contract, so the schema is selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationSchema {
    /// `{full_name, phone, guests, date, time, notes}`
    #[default]
    FullName,
    /// `{name, email, phone, guests, date, time, message}`
    Contact,
}

impl ReservationSchema {
    pub fn payload(self, draft: &ReservationDraft) -> ReservationPayload<'_> {
        match self {
            ReservationSchema::FullName => ReservationPayload::FullName(draft),
            ReservationSchema::Contact => ReservationPayload::Contact(ContactReservation {
                name: &draft.full_name,
                email: draft.email.as_deref(),
                phone: &draft.phone,
                guests: draft.guests,
                date: &draft.date,
                time: &draft.time,
                message: &draft.notes,
            }),
        }
    }
}

impl fmt::Display for ReservationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationSchema::FullName => f.write_str("full_name"),
            ReservationSchema::Contact => f.write_str("contact"),
        }
    }
}

impl FromStr for ReservationSchema {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full_name" | "fullname" => Ok(ReservationSchema::FullName),
            "contact" => Ok(ReservationSchema::Contact),
            other => Err(format!("unknown reservation schema '{other}'")),
        }
    }
}

/// Request body for `POST /api/reservations`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReservationPayload<'a> {
    FullName(&'a ReservationDraft),
    Contact(ContactReservation<'a>),
}

#[derive(Debug, Serialize)]
pub struct ContactReservation<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    pub phone: &'a str,
    pub guests: u32,
    pub date: &'a str,
    pub time: &'a str,
    pub message: &'a str,
}
