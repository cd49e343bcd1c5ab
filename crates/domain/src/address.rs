//! Shipping and billing address record.

use serde::{Deserialize, Serialize};

/// A delivery or billing address as captured by the shipping step.
///
/// Field names match the wire shape the backend expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address_line_1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub email: String,
}

impl Address {
    /// Returns the recipient's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true when the fields tax calculation depends on are present.
    pub fn has_tax_fields(&self) -> bool {
        !self.state.trim().is_empty() && !self.postal_code.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mumbai() -> Address {
        Address {
            first_name: "Asha".into(),
            last_name: "Kulkarni".into(),
            phone: "9820012345".into(),
            address_line_1: "14 Hill Road".into(),
            city: "Mumbai".into(),
            state: "Maharashtra".into(),
            postal_code: "400001".into(),
            country: "IN".into(),
            email: "asha@example.com".into(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(mumbai().full_name(), "Asha Kulkarni");
    }

    #[test]
    fn test_has_tax_fields() {
        assert!(mumbai().has_tax_fields());

        let mut incomplete = mumbai();
        incomplete.state.clear();
        assert!(!incomplete.has_tax_fields());

        let mut incomplete = mumbai();
        incomplete.postal_code = "  ".into();
        assert!(!incomplete.has_tax_fields());
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_string(&mumbai()).unwrap();
        assert!(json.contains("\"address_line_1\""));
        assert!(json.contains("\"postal_code\""));
    }
}
