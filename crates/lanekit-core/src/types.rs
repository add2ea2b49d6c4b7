//! Shared data types: profile names and device bindings.

use crate::{
    Result,
    codes::WeightUnit,
    constants::MAX_PROFILE_NAME_LENGTH,
    error::PosError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical profile name resolving to a physical device configuration.
///
/// Names are normalized (trimmed) and validated: non-empty, ASCII only,
/// at most [`MAX_PROFILE_NAME_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileName(String);

impl ProfileName {
    /// Create a new profile name with validation.
    ///
    /// # Errors
    /// Returns `PosError::Profile` if the name is empty after trimming,
    /// contains non-ASCII characters, or exceeds the length limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use lanekit_core::types::ProfileName;
    ///
    /// let name = ProfileName::new("LK-Gryphon-4500-USB").unwrap();
    /// assert_eq!(name.as_str(), "LK-Gryphon-4500-USB");
    ///
    /// assert!(ProfileName::new("   ").is_err());
    /// ```
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();

        if name.is_empty() {
            return Err(PosError::profile("Profile name cannot be empty"));
        }

        if name.len() > MAX_PROFILE_NAME_LENGTH {
            return Err(PosError::profile(format!(
                "Profile name must be at most {} chars, got {}",
                MAX_PROFILE_NAME_LENGTH,
                name.len()
            )));
        }

        if !name.is_ascii() {
            return Err(PosError::profile("Profile name must be ASCII"));
        }

        Ok(ProfileName(name.to_string()))
    }

    /// Get the profile name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProfileName {
    type Err = PosError;

    fn from_str(s: &str) -> Result<Self> {
        ProfileName::new(s)
    }
}

impl TryFrom<String> for ProfileName {
    type Error = PosError;

    fn try_from(value: String) -> Result<Self> {
        ProfileName::new(&value)
    }
}

impl From<ProfileName> for String {
    fn from(name: ProfileName) -> Self {
        name.0
    }
}

/// Kind of peripheral a profile binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Barcode scanner.
    Scanner,
    /// Weighing scale.
    Scale,
    /// RFID tag reader.
    Rfid,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scanner => write!(f, "Scanner"),
            Self::Scale => write!(f, "Scale"),
            Self::Rfid => write!(f, "RFID"),
        }
    }
}

/// Physical device configuration a profile name resolves to.
///
/// The optional fields only apply to some device kinds; a scanner binding
/// simply leaves the scale fields unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceBinding {
    /// What kind of device this profile drives.
    pub kind: DeviceKind,

    /// Device model string, for reporting.
    #[serde(default)]
    pub model: Option<String>,

    /// Scale weight unit.
    #[serde(default)]
    pub unit: Option<WeightUnit>,

    /// Scale capacity in centigrams.
    #[serde(default)]
    pub capacity_cg: Option<i32>,
}

impl DeviceBinding {
    /// Create a binding for the given device kind with no extras.
    pub fn new(kind: DeviceKind) -> Self {
        Self {
            kind,
            model: None,
            unit: None,
            capacity_cg: None,
        }
    }

    /// Set the model string.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the scale weight unit.
    pub fn with_unit(mut self, unit: WeightUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Set the scale capacity in centigrams.
    pub fn with_capacity_cg(mut self, capacity_cg: i32) -> Self {
        self.capacity_cg = Some(capacity_cg);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_name_valid() {
        let name = ProfileName::new("LK-Magellan-9800i-Scale").unwrap();
        assert_eq!(name.as_str(), "LK-Magellan-9800i-Scale");
        assert_eq!(name.to_string(), "LK-Magellan-9800i-Scale");
    }

    #[test]
    fn test_profile_name_trims() {
        let name = ProfileName::new("  LK-Scanner-O  ").unwrap();
        assert_eq!(name.as_str(), "LK-Scanner-O");
    }

    #[test]
    fn test_profile_name_rejects_empty() {
        assert!(ProfileName::new("").is_err());
        assert!(ProfileName::new("   ").is_err());
    }

    #[test]
    fn test_profile_name_rejects_non_ascii() {
        assert!(ProfileName::new("Leitor-Balança").is_err());
    }

    #[test]
    fn test_profile_name_rejects_too_long() {
        let long = "x".repeat(MAX_PROFILE_NAME_LENGTH + 1);
        assert!(ProfileName::new(&long).is_err());

        let max = "x".repeat(MAX_PROFILE_NAME_LENGTH);
        assert!(ProfileName::new(&max).is_ok());
    }

    #[test]
    fn test_profile_name_serde_round_trip() {
        let name = ProfileName::new("LK-RFID-DK001").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"LK-RFID-DK001\"");

        let back: ProfileName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);

        // Validation applies on deserialization too.
        let result: std::result::Result<ProfileName, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_device_binding_builder() {
        let binding = DeviceBinding::new(DeviceKind::Scale)
            .with_model("Magellan 9800i")
            .with_unit(WeightUnit::Pound)
            .with_capacity_cg(1_500_000);

        assert_eq!(binding.kind, DeviceKind::Scale);
        assert_eq!(binding.model.as_deref(), Some("Magellan 9800i"));
        assert_eq!(binding.unit, Some(WeightUnit::Pound));
        assert_eq!(binding.capacity_cg, Some(1_500_000));
    }

    #[test]
    fn test_device_kind_display() {
        assert_eq!(DeviceKind::Scanner.to_string(), "Scanner");
        assert_eq!(DeviceKind::Rfid.to_string(), "RFID");
    }
}
