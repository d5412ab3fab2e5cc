use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Vehicle record owned by the registry. The license number is stored in
/// canonical form and the owner username lowercased.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub username: String,
    pub license_number: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub blacklisted: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
