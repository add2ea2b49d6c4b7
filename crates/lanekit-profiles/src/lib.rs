//! Named device profile store for the lanekit peripheral toolkit.
//!
//! A profile store maps logical device names to physical device bindings,
//! the way POS deployments keep a site-specific configuration file naming
//! each lane peripheral. Opening a session starts by resolving a profile
//! name here.
//!
//! # File format
//!
//! TOML, one table entry per profile:
//!
//! ```toml
//! [profiles."LK-Gryphon-4500-USB"]
//! kind = "scanner"
//! model = "Gryphon GD4500"
//!
//! [profiles."LK-Magellan-9800i-Scale"]
//! kind = "scale"
//! unit = "pound"
//! capacity_cg = 1500000
//!
//! [profiles."LK-RFID-DK001"]
//! kind = "rfid"
//! ```
//!
//! # Examples
//!
//! ```
//! use lanekit_profiles::ProfileStore;
//!
//! let store = ProfileStore::from_toml(r#"
//!     [profiles."LK-Gryphon-4500-USB"]
//!     kind = "scanner"
//! "#).unwrap();
//!
//! let name = lanekit_core::ProfileName::new("LK-Gryphon-4500-USB").unwrap();
//! let binding = store.resolve(&name).unwrap();
//! assert_eq!(binding.kind, lanekit_core::DeviceKind::Scanner);
//! ```

use lanekit_core::{DeviceBinding, DeviceKind, PosError, ProfileName, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// On-disk layout of a profile store file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    profiles: HashMap<ProfileName, DeviceBinding>,
}

/// Mapping from logical profile names to device bindings.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: HashMap<ProfileName, DeviceBinding>,
}

impl ProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any
    /// profile name fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PosError::profile(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a store from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `PosError::Profile` on malformed TOML or invalid names.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: StoreFile =
            toml::from_str(content).map_err(|e| PosError::profile(e.to_string()))?;
        Ok(Self {
            profiles: file.profiles,
        })
    }

    /// A built-in demonstration store with one profile per device kind.
    ///
    /// Used by the example programs when no profile file is supplied.
    pub fn demo() -> Self {
        let mut store = Self::new();
        store.insert(
            ProfileName::new("LK-Gryphon-4500-USB").expect("demo name is valid"),
            DeviceBinding::new(DeviceKind::Scanner).with_model("Gryphon GD4500"),
        );
        store.insert(
            ProfileName::new("LK-Magellan-9800i-Scale").expect("demo name is valid"),
            DeviceBinding::new(DeviceKind::Scale)
                .with_model("Magellan 9800i")
                .with_unit(WeightUnit::Pound)
                .with_capacity_cg(1_500_000),
        );
        store.insert(
            ProfileName::new("LK-RFID-DK001").expect("demo name is valid"),
            DeviceBinding::new(DeviceKind::Rfid).with_model("RFID DK001"),
        );
        store
    }

    /// Add or replace a profile.
    pub fn insert(&mut self, name: ProfileName, binding: DeviceBinding) {
        self.profiles.insert(name, binding);
    }

    /// Resolve a profile name to its device binding.
    ///
    /// # Errors
    ///
    /// Returns `PosError::ProfileNotFound` for unknown names.
    pub fn resolve(&self, name: &ProfileName) -> Result<&DeviceBinding> {
        self.profiles
            .get(name)
            .ok_or_else(|| PosError::profile_not_found(name.as_str()))
    }

    /// All profile names, sorted for stable listings.
    pub fn names(&self) -> Vec<&ProfileName> {
        let mut names: Vec<_> = self.profiles.keys().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }

    /// Number of profiles in the store.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store has no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [profiles."LK-Gryphon-4500-USB"]
        kind = "scanner"
        model = "Gryphon GD4500"

        [profiles."LK-Magellan-9800i-Scale"]
        kind = "scale"
        unit = "kilogram"
        capacity_cg = 500000

        [profiles."LK-RFID-DK001"]
        kind = "rfid"
    "#;

    #[test]
    fn test_parse_sample_store() {
        let store = ProfileStore::from_toml(SAMPLE).unwrap();
        assert_eq!(store.len(), 3);

        let name = ProfileName::new("LK-Magellan-9800i-Scale").unwrap();
        let binding = store.resolve(&name).unwrap();
        assert_eq!(binding.kind, DeviceKind::Scale);
        assert_eq!(binding.unit, Some(WeightUnit::Kilogram));
        assert_eq!(binding.capacity_cg, Some(500_000));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let store = ProfileStore::from_toml(SAMPLE).unwrap();
        let name = ProfileName::new("no-such-profile").unwrap();

        let err = store.resolve(&name).unwrap_err();
        assert!(matches!(err, PosError::ProfileNotFound { .. }));
        assert_eq!(err.to_string(), "Profile not found: no-such-profile");
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = ProfileStore::from_toml("profiles = \"not a table\"");
        assert!(matches!(result, Err(PosError::Profile { .. })));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = ProfileStore::from_toml(
            r#"
            [profiles."LK-Printer"]
            kind = "printer"
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_profile_name_rejected() {
        // Non-ASCII profile names fail ProfileName validation on load.
        let result = ProfileStore::from_toml(
            "[profiles.\"Bal\u{00e7}a\"]\nkind = \"scale\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_store() {
        let store = ProfileStore::from_toml("").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let store = ProfileStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProfileStore::load("/nonexistent/profiles.toml").unwrap_err();
        assert!(matches!(err, PosError::Profile { .. }));
    }

    #[test]
    fn test_demo_store_names_sorted() {
        let store = ProfileStore::demo();
        let names: Vec<_> = store.names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["LK-Gryphon-4500-USB", "LK-Magellan-9800i-Scale", "LK-RFID-DK001"]
        );
    }
}
