use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::vehicles::repo_types::Vehicle;

/// Result of attempting to register a vehicle.
#[derive(Debug)]
pub enum RegisterOutcome {
    Created(Vehicle),
    /// The plate is already registered (for any owner).
    LicenseExists,
}

/// In-memory vehicle registry.
///
/// Plate parameters are expected pre-normalized by the caller path that
/// validates them; owner usernames are compared lowercased. The store is
/// authorization-agnostic and trusts its caller to scope operations.
pub struct VehicleStore {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl VehicleStore {
    pub fn new() -> Self {
        Self {
            vehicles: RwLock::new(Vec::new()),
        }
    }

    /// Global, owner-agnostic lookup used by the public blacklist/existence
    /// query and the recognition-driven query.
    pub fn find_by_plate(&self, plate: &str) -> Option<Vehicle> {
        self.read().iter().find(|v| v.license_number == plate).cloned()
    }

    pub fn find_by_owner_and_plate(&self, owner: &str, plate: &str) -> Option<Vehicle> {
        let owner = owner.to_lowercase();
        self.read()
            .iter()
            .find(|v| v.username == owner && v.license_number == plate)
            .cloned()
    }

    pub fn find_by_username(&self, owner: &str) -> Vec<Vehicle> {
        let owner = owner.to_lowercase();
        self.read()
            .iter()
            .filter(|v| v.username == owner)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<Vehicle> {
        self.read().clone()
    }

    /// Atomic duplicate-check plus insert: concurrent registrations for the
    /// same plate cannot both succeed. An existing plate under any owner
    /// rejects the registration.
    pub fn register(&self, mut vehicle: Vehicle) -> RegisterOutcome {
        vehicle.username = vehicle.username.to_lowercase();

        let mut vehicles = self.write();
        if vehicles.iter().any(|v| v.license_number == vehicle.license_number) {
            return RegisterOutcome::LicenseExists;
        }
        vehicles.push(vehicle.clone());
        RegisterOutcome::Created(vehicle)
    }

    /// Owner-scoped blacklist update. Idempotent per value.
    pub fn update_blacklist(&self, owner: &str, plate: &str, flag: bool) -> Option<Vehicle> {
        let owner = owner.to_lowercase();
        let mut vehicles = self.write();
        let vehicle = vehicles
            .iter_mut()
            .find(|v| v.username == owner && v.license_number == plate)?;
        vehicle.blacklisted = flag;
        Some(vehicle.clone())
    }

    /// Plate-only blacklist update used by the administrator path.
    pub fn update_blacklist_status(&self, plate: &str, flag: bool) -> Option<Vehicle> {
        let mut vehicles = self.write();
        let vehicle = vehicles.iter_mut().find(|v| v.license_number == plate)?;
        vehicle.blacklisted = flag;
        Some(vehicle.clone())
    }

    /// Removes the owner's vehicle with the given plate.
    pub fn remove(&self, owner: &str, plate: &str) -> bool {
        let owner = owner.to_lowercase();
        let mut vehicles = self.write();
        let before = vehicles.len();
        vehicles.retain(|v| !(v.username == owner && v.license_number == plate));
        vehicles.len() < before
    }

    /// Removes any vehicle matching the plate regardless of owner
    /// (administrator scope).
    pub fn remove_by_plate(&self, plate: &str) -> bool {
        let mut vehicles = self.write();
        match vehicles.iter().position(|v| v.license_number == plate) {
            Some(index) => {
                vehicles.remove(index);
                true
            }
            None => false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Vehicle>> {
        self.vehicles.read().expect("vehicle store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Vehicle>> {
        self.vehicles.write().expect("vehicle store lock poisoned")
    }
}

impl Default for VehicleStore {
    fn default() -> Self {
        Self::new()
    }
}
