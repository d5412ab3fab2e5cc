use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Structured rejections surfaced to API callers.
///
/// The display form of each variant is the machine-readable code the client
/// sees in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("USERNAME_REQUIRED")]
    UsernameRequired,
    #[error("INVALID_LICENSE")]
    InvalidLicense,
    #[error("VEHICLE_DETAILS_REQUIRED")]
    VehicleDetailsRequired,
    #[error("USERNAME_AND_LICENSE_REQUIRED")]
    UsernameAndLicenseRequired,
    #[error("LICENSE_EXISTS")]
    LicenseExists,
    #[error("EMAIL_EXISTS")]
    EmailExists,
    #[error("PROTECTED_IDENTITY")]
    ProtectedIdentity,
    #[error("INVALID_EMAIL")]
    InvalidEmail,
    #[error("PASSWORD_TOO_SHORT")]
    PasswordTooShort,
    #[error("ADMIN_ONLY")]
    AdminOnly,
    #[error("NOT_FOUND")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UsernameRequired
            | ApiError::InvalidLicense
            | ApiError::VehicleDetailsRequired
            | ApiError::UsernameAndLicenseRequired
            | ApiError::InvalidEmail
            | ApiError::PasswordTooShort => StatusCode::BAD_REQUEST,
            ApiError::LicenseExists | ApiError::EmailExists | ApiError::ProtectedIdentity => {
                StatusCode::CONFLICT
            }
            ApiError::AdminOnly => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_expected_statuses() {
        assert_eq!(ApiError::UsernameRequired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidLicense.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::LicenseExists.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::AdminOnly.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn display_is_the_wire_code() {
        assert_eq!(ApiError::LicenseExists.to_string(), "LICENSE_EXISTS");
        assert_eq!(
            ApiError::UsernameAndLicenseRequired.to_string(),
            "USERNAME_AND_LICENSE_REQUIRED"
        );
    }
}
