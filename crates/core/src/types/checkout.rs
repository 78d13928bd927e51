//! Checkout form validation.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A required field of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    Name,
    Phone,
    Address,
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Phone => write!(f, "phone"),
            Self::Address => write!(f, "address"),
        }
    }
}

/// Errors that can occur when validating a [`CheckoutForm`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// One or more required fields were left empty.
    #[error("please fill in all fields (missing: {})", join_fields(.0))]
    MissingFields(Vec<CheckoutField>),
}

fn join_fields(fields: &[CheckoutField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The order form exactly as the user submitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CheckoutForm {
    /// Create a form from the three raw field values.
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// Validate the form.
    ///
    /// A field containing only whitespace counts as empty.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing every empty field,
    /// in form order.
    pub fn validate(&self) -> Result<CheckoutDetails, CheckoutError> {
        let missing: Vec<CheckoutField> = [
            (CheckoutField::Name, &self.name),
            (CheckoutField::Phone, &self.phone),
            (CheckoutField::Address, &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        Ok(CheckoutDetails {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: self.address.trim().to_owned(),
        })
    }
}

/// A validated checkout form: all three fields are non-empty and trimmed.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutDetails {
    name: String,
    phone: String,
    address: String,
}

impl CheckoutDetails {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

// Phone and address stay out of logs.
impl fmt::Debug for CheckoutDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutDetails")
            .field("name", &self.name)
            .field("phone", &"[REDACTED]")
            .field("address", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_complete_form() {
        let details = CheckoutForm::new(" Anna ", "+7 900 000-00-00", "Lenina 1")
            .validate()
            .unwrap();
        assert_eq!(details.name(), "Anna");
        assert_eq!(details.phone(), "+7 900 000-00-00");
        assert_eq!(details.address(), "Lenina 1");
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let err = CheckoutForm::new("", "123", "  ").validate().unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MissingFields(vec![CheckoutField::Name, CheckoutField::Address])
        );
        assert_eq!(
            err.to_string(),
            "please fill in all fields (missing: name, address)"
        );
    }

    #[test]
    fn test_validate_empty_form() {
        let err = CheckoutForm::default().validate().unwrap_err();
        let CheckoutError::MissingFields(fields) = err;
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_details_debug_redacts_contact_data() {
        let details = CheckoutForm::new("Anna", "555-0100", "Baker St 221b")
            .validate()
            .unwrap();
        let debug_output = format!("{details:?}");
        assert!(debug_output.contains("Anna"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("555-0100"));
        assert!(!debug_output.contains("Baker St"));
    }
}
