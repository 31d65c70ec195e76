use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A full property record as held by the server.
///
/// `id` is the sole identity; the server assigns it and every other field
/// changes only by full-record replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,

    /// Listing date, ISO `YYYY-MM-DD` on the wire
    pub date: NaiveDate,

    /// Free-text category ("type" on the wire)
    #[serde(rename = "type")]
    pub kind: String,

    /// Display title and search key
    pub address: String,

    pub bedrooms: u32,
    pub bathrooms: u32,
    pub price: f64,

    /// Floor area
    pub area: f64,

    #[serde(default)]
    pub notes: String,
}

/// Lightweight projection used for list views before full detail is fetched.
///
/// Never independently authoritative: a full [`Property`] fetched later
/// supersedes the summary for the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub id: i64,
    pub address: String,
}

/// A record about to be created. Carries no id: the server-assigned identity
/// in the create response is authoritative, so the client never constructs one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDraft {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub price: f64,
    pub area: f64,
    #[serde(default)]
    pub notes: String,
}

impl Property {
    pub fn summary(&self) -> PropertySummary {
        PropertySummary {
            id: self.id,
            address: self.address.clone(),
        }
    }
}
