use serde::{Deserialize, Serialize};

/// Delivery address entered during checkout
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressRecord {
    /// Full street address (required)
    pub full_address: String,
    /// Optional landmark to help the courier
    pub landmark: Option<String>,
    /// Contact phone number (required)
    pub phone: String,
}

impl AddressRecord {
    /// Creates a new AddressRecord with the required fields
    pub fn new(full_address: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            full_address: full_address.into(),
            landmark: None,
            phone: phone.into(),
        }
    }

    /// Sets the landmark
    pub fn with_landmark(mut self, landmark: impl Into<String>) -> Self {
        self.landmark = Some(landmark.into());
        self
    }

    /// Names of required fields that are blank after trimming
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_address.trim().is_empty() {
            missing.push("full_address");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        missing
    }

    /// Checks if all required fields are filled in
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            AddressRecord::default().missing_fields(),
            vec!["full_address", "phone"]
        );
        assert_eq!(
            AddressRecord::new("   ", "+91 98765 43210").missing_fields(),
            vec!["full_address"]
        );
        assert_eq!(
            AddressRecord::new("12 Marine Drive", "\t").missing_fields(),
            vec!["phone"]
        );

        // Landmark is optional
        let address = AddressRecord::new("12 Marine Drive", "+91 98765 43210");
        assert!(address.is_complete());
    }
}
