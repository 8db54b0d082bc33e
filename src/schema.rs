use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::ValidateEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Address,
    Email,
    Description,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Phone,
        Field::Address,
        Field::Email,
        Field::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        use Field::*;
        match self {
            Name => "name",
            Phone => "phone",
            Address => "address",
            Email => "email",
            Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// At least `n` characters after trimming.
    MinLen(usize),
    /// Absent, empty or a syntactically valid address.
    Email,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub required: bool,
    pub rule: Rule,
    pub message: &'static str,
}

/// Every constraint a contact submission has to meet. The form and the
/// endpoint both check against this table and nothing else.
pub const CONTACT_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        required: true,
        rule: Rule::MinLen(2),
        message: "Name must be at least 2 characters",
    },
    FieldRule {
        field: Field::Phone,
        required: true,
        rule: Rule::MinLen(10),
        message: "Phone number must be at least 10 digits",
    },
    FieldRule {
        field: Field::Address,
        required: true,
        rule: Rule::MinLen(10),
        message: "Address must be at least 10 characters",
    },
    FieldRule {
        field: Field::Email,
        required: false,
        rule: Rule::Email,
        message: "Invalid email",
    },
    FieldRule {
        field: Field::Description,
        required: true,
        rule: Rule::MinLen(10),
        message: "Description must be at least 10 characters",
    },
];

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email pattern compiles")
});

/// A dotted domain with a real top-level part, no leading or doubled dots.
fn is_email(value: &str) -> bool {
    value.validate_email()
        && !value.starts_with('.')
        && !value.contains("..")
        && EMAIL_SHAPE.is_match(value)
}

fn passes(rule: &FieldRule, value: Option<&str>) -> bool {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let Some(value) = value else {
        return !rule.required;
    };

    match rule.rule {
        Rule::MinLen(n) => value.chars().count() >= n,
        Rule::Email => is_email(value),
    }
}

/// Checks a single field in isolation and returns the first violated message.
pub fn validate_field(field: Field, value: Option<&str>) -> Option<&'static str> {
    CONTACT_RULES
        .iter()
        .filter(|rule| rule.field == field)
        .find(|rule| !passes(rule, value))
        .map(|rule| rule.message)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn clear_field(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// A candidate submission as typed into the form or posted to the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
    pub email: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ContactInput {
    pub fn get(&self, field: Field) -> Option<&str> {
        use Field::*;
        match field {
            Name => Some(&self.name),
            Phone => Some(&self.phone),
            Address => Some(&self.address),
            Email => self.email.as_deref(),
            Description => Some(&self.description),
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        use Field::*;
        match field {
            Name => self.name = value,
            Phone => self.phone = value,
            Address => self.address = value,
            Email => self.email = Some(value),
            Description => self.description = value,
        }
    }

    pub fn validate(&self) -> Result<ValidContact, FieldErrors> {
        let mut errors = FieldErrors::default();
        for rule in CONTACT_RULES {
            if !passes(rule, self.get(rule.field)) {
                errors.add(rule.field, rule.message);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidContact {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: self.address.trim().to_owned(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(str::to_owned),
            description: self.description.trim().to_owned(),
        })
    }
}

/// A submission that passed [`CONTACT_RULES`]. Only [`ContactInput::validate`] builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidContact {
    name: String,
    phone: String,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    description: String,
}

impl ValidContact {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: Option<String>,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ContactSubmission {
    pub fn new(contact: ValidContact) -> ContactSubmission {
        let ValidContact { name, phone, address, email, description } = contact;
        ContactSubmission {
            id: Uuid::now_v7(),
            name,
            phone,
            address,
            email,
            description,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Body of a successful creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

/// Body of every non-2xx response from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}
