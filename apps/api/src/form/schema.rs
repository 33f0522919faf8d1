//! Resume form draft and its validation schema.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::form::list::FormList;
use crate::models::resume::{
    AchievementEntry, EducationEntry, ExperienceEntry, PersonalInformation, ResumeSubmission,
};
use crate::templates::TemplateId;

/// Contact block as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDraft {
    pub name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,
    pub linkedin_url: String,
}

/// Editable resume draft. A fresh form has one blank item in each section.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeForm {
    pub template_id: String,
    pub personal_information: PersonalDraft,
    pub job_title: String,
    pub career_objective: String,
    pub skills: FormList<String>,
    pub education: FormList<EducationEntry>,
    pub experience: FormList<ExperienceEntry>,
    pub achievements: FormList<AchievementEntry>,
}

impl Default for ResumeForm {
    fn default() -> Self {
        Self {
            template_id: String::new(),
            personal_information: PersonalDraft::default(),
            job_title: String::new(),
            career_objective: String::new(),
            skills: FormList::with_blank(),
            education: FormList::with_blank(),
            experience: FormList::with_blank(),
            achievements: FormList::with_blank(),
        }
    }
}

/// One failed rule, addressed by a dotted path such as `education[1].passing_year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// All failed rules, in form order. At most one message per path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    fn add(&mut self, path: impl Into<String>, message: &str) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.to_string(),
        });
    }

    /// The message for `path`, if that field failed.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn is_http_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// Required field: blank fails with `required`.
fn required(errors: &mut FormErrors, path: impl Into<String>, value: &str, required: &str) {
    if is_blank(value) {
        errors.add(path, required);
    }
}

/// Required field with a format rule checked only once the field is filled.
fn required_with(
    errors: &mut FormErrors,
    path: impl Into<String>,
    value: &str,
    required: &str,
    valid: fn(&str) -> bool,
    invalid: &str,
) {
    if is_blank(value) {
        errors.add(path, required);
    } else if !valid(value) {
        errors.add(path, invalid);
    }
}

fn non_empty<T>(errors: &mut FormErrors, path: &str, list: &FormList<T>, message: &str) {
    if list.is_empty() {
        errors.add(path, message);
    }
}

impl ResumeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_template(&mut self, template: TemplateId) {
        self.template_id = template.as_str().to_string();
    }

    /// Applies the form schema. On success returns the submission to POST.
    pub fn validate(&self) -> Result<ResumeSubmission, FormErrors> {
        let mut errors = FormErrors::default();
        let info = &self.personal_information;

        required(&mut errors, "template_id", &self.template_id, "Template is required");
        required(&mut errors, "personal_information.name", &info.name, "Name is required");
        required(
            &mut errors,
            "personal_information.last_name",
            &info.last_name,
            "Last Name is required",
        );
        required_with(
            &mut errors,
            "personal_information.email_address",
            &info.email_address,
            "Email is required",
            |v| EMAIL_RE.is_match(v),
            "Invalid email",
        );
        required_with(
            &mut errors,
            "personal_information.phone_number",
            &info.phone_number,
            "Phone number is required",
            is_digits,
            "Phone number must contain only digits",
        );
        required_with(
            &mut errors,
            "personal_information.linkedin_url",
            &info.linkedin_url,
            "LinkedIn URL is required",
            is_http_url,
            "Invalid LinkedIn URL",
        );
        required(&mut errors, "job_title", &self.job_title, "Job Title is required");
        required(
            &mut errors,
            "career_objective",
            &self.career_objective,
            "Objective is required",
        );

        non_empty(&mut errors, "skills", &self.skills, "At least one skill is required");

        non_empty(
            &mut errors,
            "education",
            &self.education,
            "At least one education is required",
        );
        for (i, edu) in self.education.iter().enumerate() {
            required(
                &mut errors,
                format!("education[{i}].school_name"),
                &edu.school_name,
                "School is required",
            );
            required_with(
                &mut errors,
                format!("education[{i}].passing_year"),
                &edu.passing_year,
                "Passing Year is required",
                is_digits,
                "Passing Year must contain only digits",
            );
            required(
                &mut errors,
                format!("education[{i}].description"),
                &edu.description,
                "Description is required",
            );
        }

        non_empty(
            &mut errors,
            "experience",
            &self.experience,
            "At least one experience is required",
        );
        for (i, exp) in self.experience.iter().enumerate() {
            required(
                &mut errors,
                format!("experience[{i}].company_name"),
                &exp.company_name,
                "Company is required",
            );
            required_with(
                &mut errors,
                format!("experience[{i}].passing_year"),
                &exp.passing_year,
                "Passing Year is required",
                is_digits,
                "Passing Year must contain only digits",
            );
            required(
                &mut errors,
                format!("experience[{i}].responsibilities"),
                &exp.responsibilities,
                "Responsibility is required",
            );
        }

        non_empty(
            &mut errors,
            "achievements",
            &self.achievements,
            "At least one achievement is required",
        );
        for (i, ach) in self.achievements.iter().enumerate() {
            required(
                &mut errors,
                format!("achievements[{i}].field"),
                &ach.field,
                "Field is required",
            );
            required(
                &mut errors,
                format!("achievements[{i}].awards"),
                &ach.awards,
                "Award is required",
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ResumeSubmission {
            template_id: Value::String(self.template_id.clone()),
            personal_information: Some(PersonalInformation {
                name: Some(info.name.clone()),
                last_name: Some(info.last_name.clone()),
                email_address: Some(info.email_address.clone()),
                phone_number: Some(info.phone_number.clone()),
                linkedin_url: Some(info.linkedin_url.clone()),
            }),
            job_title: Some(self.job_title.clone()),
            career_objective: Some(self.career_objective.clone()),
            skills: self.skills.as_slice().to_vec(),
            education: self.education.as_slice().to_vec(),
            experience: self.experience.as_slice().to_vec(),
            achievements: self.achievements.as_slice().to_vec(),
        })
    }
}
