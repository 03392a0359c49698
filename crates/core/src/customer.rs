//! Buyer details

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Contact and delivery details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDetails {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,
}

/// A single buyer field, used to report which fields failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuyerField {
    /// `firstName`
    FirstName,
    /// `lastName`
    LastName,
    /// `email`
    Email,
    /// `phone`
    Phone,
    /// `address`
    Address,
    /// `city`
    City,
    /// `postalCode`
    PostalCode,
}

impl BuyerField {
    /// Form field name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalCode",
        }
    }
}

impl fmt::Display for BuyerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buyer details that cannot be used for an order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuyerValidationError {
    /// Some fields are blank or malformed.
    #[error("please fill in all required fields correctly: {}", join_fields(.0))]
    InvalidFields(SmallVec<[BuyerField; 7]>),
}

impl BuyerValidationError {
    /// Fields that failed validation, in form order.
    pub fn fields(&self) -> &[BuyerField] {
        match self {
            Self::InvalidFields(fields) => fields,
        }
    }
}

fn join_fields(fields: &[BuyerField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl BuyerDetails {
    /// Check that every field is present once trimmed and that the email, as entered,
    /// looks like an address.
    ///
    /// Returns the trimmed details on success.
    ///
    /// # Errors
    ///
    /// Returns [`BuyerValidationError::InvalidFields`] listing every blank field, plus
    /// `email` when it does not look like `local@domain.tld`.
    pub fn validate(&self) -> Result<Self, BuyerValidationError> {
        let trimmed = self.trimmed();

        let mut invalid: SmallVec<[BuyerField; 7]> = trimmed
            .fields()
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();

        if !trimmed.email.is_empty() && !EMAIL.is_match(&self.email) {
            invalid.push(BuyerField::Email);
        }

        if invalid.is_empty() {
            Ok(trimmed)
        } else {
            Err(BuyerValidationError::InvalidFields(invalid))
        }
    }

    fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
        }
    }

    fn fields(&self) -> [(BuyerField, &str); 7] {
        [
            (BuyerField::FirstName, &self.first_name),
            (BuyerField::LastName, &self.last_name),
            (BuyerField::Email, &self.email),
            (BuyerField::Phone, &self.phone),
            (BuyerField::Address, &self.address),
            (BuyerField::City, &self.city),
            (BuyerField::PostalCode, &self.postal_code),
        ]
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
