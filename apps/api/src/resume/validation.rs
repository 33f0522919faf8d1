use serde_json::Value;

use crate::errors::AppError;
use crate::models::resume::PersonalInformation;

/// Required keys of `personal_information`, in the order they are reported.
pub const REQUIRED_PERSONAL_FIELDS: [&str; 5] = [
    "name",
    "last_name",
    "email_address",
    "phone_number",
    "linkedin_url",
];

/// Contact details borrowed out of a submission whose keys were checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub email_address: &'a str,
    pub phone_number: &'a str,
    pub linkedin_url: &'a str,
}

/// Names of the required keys absent from the raw body's
/// `personal_information` object. Presence only: a key holding null or an
/// empty string is present. A missing or non-object value misses everything.
pub fn missing_personal_fields(body: &Value) -> Vec<&'static str> {
    let Some(info) = body.get("personal_information").and_then(Value::as_object) else {
        return REQUIRED_PERSONAL_FIELDS.to_vec();
    };
    REQUIRED_PERSONAL_FIELDS
        .into_iter()
        .filter(|field| !info.contains_key(*field))
        .collect()
}

pub fn require_personal_fields(body: &Value) -> Result<(), AppError> {
    let missing = missing_personal_fields(body);
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Bad Request! Missing required fields in personal_information: {}",
        missing.join(", ")
    )))
}

/// Borrows the contact values out; null values read as empty text.
pub fn contact(info: Option<&PersonalInformation>) -> Contact<'_> {
    let Some(info) = info else {
        return Contact {
            name: "",
            last_name: "",
            email_address: "",
            phone_number: "",
            linkedin_url: "",
        };
    };
    Contact {
        name: text(&info.name),
        last_name: text(&info.last_name),
        email_address: text(&info.email_address),
        phone_number: text(&info.phone_number),
        linkedin_url: text(&info.linkedin_url),
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
