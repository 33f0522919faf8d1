use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/resume`.
///
/// Built from the raw JSON only after the template id and the presence of
/// the personal-information keys have been checked, so every field is
/// lenient: scalars are coerced to text, null or absent lists are empty, and
/// a lone value where a list is expected becomes a one-item list.
/// `template_id` stays a raw JSON value; only the strings `"1"`, `"2"` and
/// `"3"` name a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSubmission {
    #[serde(default)]
    pub template_id: Value,
    #[serde(default, deserialize_with = "lenient_object")]
    pub personal_information: Option<PersonalInformation>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub career_objective: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub achievements: Vec<AchievementEntry>,
}

impl ResumeSubmission {
    pub fn from_json(body: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(body)
    }
}

/// Contact block. Key presence is checked on the raw body by
/// `resume::validation::missing_personal_fields`; here a null value is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInformation {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub school_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub passing_year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub passing_year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub responsibilities: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub awards: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field decoding
// ────────────────────────────────────────────────────────────────────────────

/// Text form of a JSON value: strings as-is, other scalars via `to_string`,
/// arrays and objects as compact JSON. Null has no text.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(text(&Value::deserialize(d)?))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text(&Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(into_items(Value::deserialize(d)?)
        .iter()
        .map(|v| text(v).unwrap_or_default())
        .collect())
}

/// Items that are not objects become blank entries.
fn lenient_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(into_items(Value::deserialize(d)?)
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect())
}

fn lenient_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        v @ Value::Object(_) => Ok(serde_json::from_value(v).ok()),
        _ => Ok(None),
    }
}
