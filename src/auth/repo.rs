use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::auth::repo_types::User;
use crate::auth::services::{phone_signature, strip_non_digits};
use crate::config::AdminConfig;

/// Result of attempting to create an identity.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(User),
    /// The target username is the protected administrator identity; nothing
    /// was written. Carries the record the caller resolves to instead.
    ProtectedIdentity(User),
}

/// In-memory identity store.
///
/// Records are keyed by lowercased username; every lookup is
/// case-insensitive on the key. Data is reset on restart.
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
    admin_email: String,
    admin_enabled: bool,
}

impl UserStore {
    /// Creates the store with a pre-seeded demo account and, when the
    /// administrator feature is enabled, the administrator identity.
    pub fn new(admin: &AdminConfig) -> Self {
        let store = Self {
            users: RwLock::new(HashMap::new()),
            admin_email: admin.email.to_lowercase(),
            admin_enabled: admin.enabled,
        };

        let demo = User::new("demo@parallax.test", "demo@parallax.test", "Demo User", "DemoPass123");
        store.write().insert(demo.username.clone(), demo);

        if admin.enabled {
            let mut seeded = User::new(&admin.email, &admin.email, "Parallax Admin", &admin.password);
            seeded.username = seeded.username.to_lowercase();
            seeded.admin = true;
            info!(username = %seeded.username, "seeded administrator identity");
            store.write().insert(seeded.username.clone(), seeded);
        }

        store
    }

    /// Resolves an identity by username/email or, failing that, by normalized
    /// phone signature. The credential must equal the stored credential
    /// exactly; no hashing is performed yet.
    pub fn find_by_identifier_and_password(&self, identifier: &str, password: &str) -> Option<User> {
        let users = self.read();
        if let Some(user) = users.get(&identifier.to_lowercase()) {
            if user.password == password {
                return Some(user.clone());
            }
        }

        let digits = strip_non_digits(identifier);
        if digits.is_empty() {
            return None;
        }
        self.match_by_signature(&users, &digits)
            .filter(|user| user.password == password)
    }

    /// Case-insensitive exact lookup on the store key.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.read().get(&email.to_lowercase()).cloned()
    }

    /// Both inputs are normalized by stripping non-digits before comparing
    /// against every stored identity's phone signature.
    pub fn find_by_phone(&self, phone_country: &str, phone: &str) -> Option<User> {
        let signature = phone_signature(phone_country, phone);
        if signature.is_empty() {
            return None;
        }
        self.match_by_signature(&self.read(), &signature)
    }

    // Ties between identities sharing a signature resolve to the smallest
    // username.
    fn match_by_signature(&self, users: &HashMap<String, User>, signature: &str) -> Option<User> {
        users
            .values()
            .filter(|u| u.phone_country.is_some() && u.phone.is_some())
            .filter(|u| {
                phone_signature(
                    u.phone_country.as_deref().unwrap_or_default(),
                    u.phone.as_deref().unwrap_or_default(),
                ) == signature
            })
            .min_by(|a, b| a.username.cmp(&b.username))
            .cloned()
    }

    /// Inserts a new identity under its lowercased username. The protected
    /// administrator username can never be reassigned through this flow: the
    /// existing administrator record (when seeded) is returned unchanged.
    pub fn create(&self, mut user: User) -> CreateOutcome {
        user.username = user.username.to_lowercase();
        let key = user.username.clone();

        let mut users = self.write();
        if key == self.admin_email {
            return CreateOutcome::ProtectedIdentity(users.get(&key).cloned().unwrap_or(user));
        }
        users.insert(key, user.clone());
        CreateOutcome::Created(user)
    }

    /// True only when the identity exists, carries the administrator flag,
    /// and the administrator feature is enabled process-wide.
    pub fn is_admin(&self, username: &str) -> bool {
        self.admin_enabled
            && self
                .read()
                .get(&username.to_lowercase())
                .map(|u| u.admin)
                .unwrap_or(false)
    }

    /// Updates contact details in place. Changing the email re-keys the
    /// record under the new normalized key in one atomic swap; a new key
    /// already held by another identity (the administrator included) is
    /// refused.
    pub fn update_contact(
        &self,
        username: &str,
        new_email: &str,
        phone_country: Option<String>,
        phone: Option<String>,
    ) -> Option<User> {
        let key = username.to_lowercase();
        let new_key = new_email.to_lowercase();

        let mut users = self.write();
        if new_key != key && users.contains_key(&new_key) {
            return None;
        }
        let mut existing = users.remove(&key)?;
        existing.username = new_key.clone();
        existing.email = new_key.clone();
        existing.phone_country = phone_country;
        existing.phone = phone;
        users.insert(new_key, existing.clone());
        Some(existing)
    }

    pub fn update_password(&self, username: &str, new_password: &str) -> Option<User> {
        let mut users = self.write();
        let existing = users.get_mut(&username.to_lowercase())?;
        existing.password = new_password.to_string();
        Some(existing.clone())
    }

    pub fn delete(&self, username: &str) -> bool {
        self.write().remove(&username.to_lowercase()).is_some()
    }

    /// Helper primarily for testing/debugging.
    pub fn all(&self) -> Vec<User> {
        self.read().values().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, User>> {
        self.users.read().expect("user store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, User>> {
        self.users.write().expect("user store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_config(enabled: bool) -> AdminConfig {
        AdminConfig {
            enabled,
            email: "admin@parallax.local".into(),
            password: "Admin1234!".into(),
        }
    }

    fn store() -> UserStore {
        UserStore::new(&admin_config(true))
    }

    fn user_with_phone(username: &str, country: &str, phone: &str) -> User {
        let mut user = User::new(username, username, username, "pw");
        user.phone_country = Some(country.into());
        user.phone = Some(phone.into());
        user
    }

    #[test]
    fn seeds_demo_and_admin() {
        let store = store();
        assert!(store.find_by_email("demo@parallax.test").is_some());
        let admin = store.find_by_email("ADMIN@parallax.local").expect("admin seeded");
        assert!(admin.admin);
    }

    #[test]
    fn login_is_case_insensitive_on_identifier() {
        let store = store();
        let found = store.find_by_identifier_and_password("DEMO@Parallax.Test", "DemoPass123");
        assert_eq!(found.map(|u| u.username), Some("demo@parallax.test".into()));
    }

    #[test]
    fn login_rejects_wrong_password() {
        let store = store();
        assert!(store
            .find_by_identifier_and_password("demo@parallax.test", "nope")
            .is_none());
    }

    #[test]
    fn login_falls_back_to_phone_signature() {
        let store = store();
        store.create(user_with_phone("bob@x.com", "+46", "70-123 45 67"));
        let found = store.find_by_identifier_and_password("+46 70 123 45 67", "pw");
        assert_eq!(found.map(|u| u.username), Some("bob@x.com".into()));
    }

    #[test]
    fn phone_fallback_still_requires_matching_password() {
        let store = store();
        store.create(user_with_phone("bob@x.com", "+46", "701234567"));
        assert!(store
            .find_by_identifier_and_password("46701234567", "wrong")
            .is_none());
    }

    #[test]
    fn find_by_phone_normalizes_both_sides() {
        let store = store();
        store.create(user_with_phone("carol@x.com", "1", "(555) 867-5309"));
        let found = store.find_by_phone("+1", "555 867 5309");
        assert_eq!(found.map(|u| u.username), Some("carol@x.com".into()));
    }

    #[test]
    fn shared_phone_signature_resolves_to_smallest_username() {
        let store = store();
        store.create(user_with_phone("zed@x.com", "46", "701234567"));
        store.create(user_with_phone("amy@x.com", "+46", "70 123 45 67"));
        let found = store.find_by_phone("46", "701234567");
        assert_eq!(found.map(|u| u.username), Some("amy@x.com".into()));
    }

    #[test]
    fn create_never_overrides_the_admin_identity() {
        let store = store();
        let before = store.all().len();
        let outcome = store.create(User::new(
            "Admin@Parallax.Local",
            "admin@parallax.local",
            "Impostor",
            "hacked",
        ));
        match outcome {
            CreateOutcome::ProtectedIdentity(existing) => {
                assert_eq!(existing.display_name, "Parallax Admin");
                assert!(existing.admin);
            }
            CreateOutcome::Created(_) => panic!("admin identity must be protected"),
        }
        assert_eq!(store.all().len(), before);
        assert_eq!(
            store.find_by_email("admin@parallax.local").unwrap().password,
            "Admin1234!"
        );
    }

    #[test]
    fn admin_flag_requires_feature_enabled() {
        let enabled = store();
        assert!(enabled.is_admin("admin@parallax.local"));
        assert!(!enabled.is_admin("demo@parallax.test"));

        let disabled = UserStore::new(&admin_config(false));
        assert!(disabled.find_by_email("admin@parallax.local").is_none());
        assert!(!disabled.is_admin("admin@parallax.local"));
    }

    #[test]
    fn update_contact_rekeys_atomically() {
        let store = store();
        store.create(User::new("old@x.com", "old@x.com", "Old", "pw"));
        let updated = store
            .update_contact("OLD@x.com", "New@Y.com", Some("46".into()), Some("701234567".into()))
            .expect("update succeeds");
        assert_eq!(updated.username, "new@y.com");
        assert!(store.find_by_email("old@x.com").is_none());
        assert_eq!(
            store.find_by_email("new@y.com").unwrap().phone.as_deref(),
            Some("701234567")
        );
    }

    #[test]
    fn update_contact_refuses_taken_keys() {
        let store = store();
        store.create(User::new("old@x.com", "old@x.com", "Old", "pw"));
        assert!(store
            .update_contact("old@x.com", "demo@parallax.test", None, None)
            .is_none());
        assert!(store
            .update_contact("old@x.com", "admin@parallax.local", None, None)
            .is_none());
        assert!(store.find_by_email("old@x.com").is_some());
    }

    #[test]
    fn update_contact_missing_user_is_none() {
        assert!(store().update_contact("ghost@x.com", "a@b.c", None, None).is_none());
    }

    #[test]
    fn update_password_and_delete() {
        let store = store();
        store.create(User::new("eve@x.com", "eve@x.com", "Eve", "pw"));
        store.update_password("eve@x.com", "pw2").expect("password updated");
        assert!(store.find_by_identifier_and_password("eve@x.com", "pw2").is_some());
        assert!(store.delete("EVE@x.com"));
        assert!(!store.delete("eve@x.com"));
    }
}
