use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::User;
use crate::vehicles::repo_types::Vehicle;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub license: Option<String>,
}

/// Request body shared by the register, delete and blacklist operations;
/// each handler validates the fields it needs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub blacklisted: bool,
}

/// Vehicle enriched with owner contact details for the administrator view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleView {
    pub license_number: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub blacklisted: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
}

impl VehicleView {
    pub fn from(vehicle: Vehicle, owner: Option<User>) -> Self {
        let (owner_email, owner_phone_country, owner_phone) = match owner {
            Some(user) => (Some(user.email), user.phone_country, user.phone),
            None => (None, None, None),
        };
        Self {
            license_number: vehicle.license_number,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            blacklisted: vehicle.blacklisted,
            created_at: vehicle.created_at,
            owner_email,
            owner_phone_country,
            owner_phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminVehicleList {
    pub vehicles: Vec<VehicleView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistResponse {
    pub license_number: String,
    pub blacklisted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateQueryResponse {
    pub found: bool,
    pub license_number: String,
    pub blacklisted: bool,
}

/// Response of the image-driven query. Soft negatives (unreadable image,
/// recognizer unavailable) keep `success`/`message` only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_in_system: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklisted: Option<bool>,
    pub message: String,
}

impl ImageQueryResponse {
    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            plate_found: None,
            license_number: None,
            found_in_system: None,
            blacklisted: None,
            message: message.to_string(),
        }
    }

    pub fn unable_to_analyze() -> Self {
        Self::rejected("Unable to analyze image at this time.")
    }

    pub fn no_readable_plate() -> Self {
        Self {
            success: true,
            plate_found: Some(false),
            license_number: None,
            found_in_system: Some(false),
            blacklisted: Some(false),
            message: "No readable license plate was found in the image.".into(),
        }
    }

    pub fn detected(plate: String, found_in_system: bool, blacklisted: bool) -> Self {
        let message = if !found_in_system {
            format!("Detected plate {plate}. This plate is not registered in Parallax.")
        } else if blacklisted {
            format!("Detected plate {plate}. This plate is registered and currently blacklisted.")
        } else {
            format!("Detected plate {plate}. This plate is registered and not blacklisted.")
        };
        Self {
            success: true,
            plate_found: Some(true),
            license_number: Some(plate),
            found_in_system: Some(found_in_system),
            blacklisted: Some(blacklisted),
            message,
        }
    }
}
