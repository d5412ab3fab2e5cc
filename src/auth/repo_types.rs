use serde::{Deserialize, Serialize};

/// User record held by the identity store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,             // case-insensitive key, kept lowercased
    pub email: String,
    pub display_name: String,
    // TODO: hash passwords before any non-demo deployment
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

impl User {
    pub fn new(username: &str, email: &str, display_name: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            password: password.to_string(),
            phone_country: None,
            phone: None,
            admin: false,
        }
    }
}
