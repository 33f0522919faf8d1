use serde::{Deserialize, Serialize};

/// Data merged into a DOCX template. Field names match the template
/// placeholders, hence the PascalCase renaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergePayload {
    pub name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,
    /// HTML anchor: `<a href="{url}">LinkedIn</a>`.
    #[serde(rename = "LinkedIn")]
    pub linked_in: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub education: Vec<MergeEducation>,
    pub experience: Vec<MergeExperience>,
    pub achievements: Vec<MergeAchievement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeEducation {
    pub school_name: String,
    pub year: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeExperience {
    pub company_name: String,
    pub year: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeAchievement {
    #[serde(rename = "Type")]
    pub kind: String,
    pub description: String,
}
