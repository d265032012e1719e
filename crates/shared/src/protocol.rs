use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::{EventId, SchoolId, UserId},
    error::DomainError,
};

/// Credential assigned to every account provisioned from the facilitator
/// dashboard. Holders are expected to reset it out-of-band.
///
/// This is a product decision carried over as-is; replacing it with a
/// generated credential plus reset link needs product sign-off.
pub const PLACEHOLDER_PASSWORD: &str = "password";

pub const VOLUNTEER_STATUS_ACTIVE: &str = "active";

pub const SCHOOL_OPTIONS: [&str; 10] = [
    "Blackhawk Middle School",
    "Pflugerville High School",
    "Park Crest Middle School",
    "Kelly Lane Middle School",
    "Cele Middle School",
    "Rowe Lane Elementary",
    "Murchison Elementary",
    "Hendrickson High School",
    "Westview Middle School",
    "Timmerman Elementary",
];

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilitator {
    pub id: UserId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Facilitator {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Server-owned event as returned by the events endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub start_location: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub end_location: String,
    /// ISO calendar date or full timestamp, whichever the backend stored.
    #[serde(default, deserialize_with = "nullable_string")]
    pub date: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub end_time: String,
}

impl Event {
    pub fn calendar_date(&self) -> Result<NaiveDate, DomainError> {
        normalize_calendar_date(&self.date)
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (taken as its UTC date).
pub fn normalize_calendar_date(raw: &str) -> Result<NaiveDate, DomainError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }
    Err(DomainError::InvalidDate(raw.to_string()))
}

/// Body of the create-event request. The endpoint takes camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_location: String,
    pub end_location: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub waiver: bool,
}

impl Default for NewParent {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            waiver: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVolunteer {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
    pub email: String,
    pub phone: String,
    pub interest: String,
    pub preferred_school: String,
}

/// Volunteer draft augmented with the account defaults the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerProvisioning {
    #[serde(flatten)]
    pub volunteer: NewVolunteer,
    pub password: String,
    pub facilitator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
    pub flexible: bool,
    pub background_check: bool,
    pub status: String,
}

impl VolunteerProvisioning {
    pub fn new(volunteer: NewVolunteer, school_id: Option<SchoolId>) -> Self {
        Self {
            volunteer,
            password: PLACEHOLDER_PASSWORD.to_string(),
            facilitator: false,
            school_id,
            flexible: true,
            background_check: true,
            status: VOLUNTEER_STATUS_ACTIVE.to_string(),
        }
    }
}
