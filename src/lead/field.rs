//! Form fields, the lead record and the fixed step grouping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier for one input of the lead capture form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Website,
    Instagram,
}

impl Field {
    /// All fields in form order
    pub fn all() -> &'static [Field] {
        &[
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Website,
            Field::Instagram,
        ]
    }

    /// Wire name, as used in request bodies and analytics events
    pub fn name(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Website => "website",
            Field::Instagram => "instagram",
        }
    }

    /// Human-readable label for form rendering
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Email => "Email address",
            Field::Website => "Business website",
            Field::Instagram => "Instagram (optional)",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::FirstName => "Jane",
            Field::LastName => "Doe",
            Field::Email => "jane@yourbusiness.com",
            Field::Website => "https://yourbusiness.com",
            Field::Instagram => "https://instagram.com/yourbusiness",
        }
    }

    /// Whether an empty value is acceptable
    pub fn is_optional(&self) -> bool {
        matches!(self, Field::Instagram)
    }

    /// Maximum accepted length (in characters, after trimming)
    pub fn max_length(&self) -> usize {
        match self {
            Field::FirstName | Field::LastName => 50,
            Field::Email | Field::Website | Field::Instagram => 255,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown field name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the wire name as well as snake/kebab spellings from the CLI
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "firstname" => Ok(Field::FirstName),
            "lastname" => Ok(Field::LastName),
            "email" => Ok(Field::Email),
            "website" => Ok(Field::Website),
            "instagram" => Ok(Field::Instagram),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// The working data of the lead capture form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub website: String,
    /// May be an empty string
    #[serde(default)]
    pub instagram: String,
}

impl LeadRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Website => &self.website,
            Field::Instagram => &self.instagram,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Email => self.email = value,
            Field::Website => self.website = value,
            Field::Instagram => self.instagram = value,
        }
    }

    /// True when every field is empty
    pub fn is_empty(&self) -> bool {
        *self == LeadRecord::default()
    }
}

/// A named, ordered group of fields presented together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub label: &'static str,
    pub fields: &'static [Field],
}

/// The fixed wizard steps, in order
pub const STEPS: &[Step] = &[
    Step {
        label: "Name",
        fields: &[Field::FirstName, Field::LastName],
    },
    Step {
        label: "Contact",
        fields: &[Field::Email],
    },
    Step {
        label: "Business",
        fields: &[Field::Website, Field::Instagram],
    },
];

/// Index of the step that shows the email field
pub const CONTACT_STEP: usize = 1;

/// Index of the step a field belongs to
pub fn step_of(field: Field) -> usize {
    STEPS
        .iter()
        .position(|step| step.fields.contains(&field))
        .unwrap_or(0)
}
