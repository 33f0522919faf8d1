use crate::models::merge::{MergeAchievement, MergeEducation, MergeExperience, MergePayload};
use crate::models::resume::ResumeSubmission;
use crate::resume::validation::Contact;

/// Wraps a profile URL in the anchor the templates render as a link.
/// The URL is inserted verbatim.
pub fn linkedin_anchor(url: &str) -> String {
    format!(r#"<a href="{url}">LinkedIn</a>"#)
}

/// Maps a checked submission onto the template placeholder names.
/// List order is preserved.
pub fn to_merge_payload(contact: Contact<'_>, submission: &ResumeSubmission) -> MergePayload {
    MergePayload {
        name: contact.name.to_string(),
        last_name: contact.last_name.to_string(),
        email_address: contact.email_address.to_string(),
        phone_number: contact.phone_number.to_string(),
        linked_in: linkedin_anchor(contact.linkedin_url),
        job_title: submission.job_title.clone(),
        summary: submission.career_objective.clone(),
        skills: submission.skills.clone(),
        education: submission
            .education
            .iter()
            .map(|edu| MergeEducation {
                school_name: edu.school_name.clone(),
                year: edu.passing_year.clone(),
                description: edu.description.clone(),
            })
            .collect(),
        experience: submission
            .experience
            .iter()
            .map(|exp| MergeExperience {
                company_name: exp.company_name.clone(),
                year: exp.passing_year.clone(),
                description: exp.responsibilities.clone(),
            })
            .collect(),
        achievements: submission
            .achievements
            .iter()
            .map(|ach| MergeAchievement {
                kind: ach.field.clone(),
                description: ach.awards.clone(),
            })
            .collect(),
    }
}
