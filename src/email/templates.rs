use minijinja::Environment;
use serde::Serialize;

use crate::email::EmailError;

const SUPPORT_RESPONSE: &str = "support_response.html";
const SUBMISSION_UPDATE: &str = "submission_update.html";

/// Context for the support-response email
#[derive(Debug, Clone, Serialize)]
pub struct SupportResponseEmail {
    pub user_name: Option<String>,
    pub message_subject: String,
    pub user_message: String,
    pub admin_response: String,
}

/// Context for a submission status or payment update email
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionUpdateEmail {
    pub user_name: Option<String>,
    pub title: String,
    pub summary: String,
    pub applicant: String,
    pub call_up: String,
    pub status: String,
    pub payment_verified: bool,
    pub remarks: Option<String>,
}

/// HTML email templates; `.html` names are auto-escaped
pub struct EmailTemplates {
    env: Environment<'static>,
}

impl EmailTemplates {
    pub fn new() -> Result<Self, EmailError> {
        let mut env = Environment::new();
        env.add_template(
            SUPPORT_RESPONSE,
            include_str!("../../templates/email/support_response.html"),
        )?;
        env.add_template(
            SUBMISSION_UPDATE,
            include_str!("../../templates/email/submission_update.html"),
        )?;
        Ok(Self { env })
    }

    pub fn support_response(&self, email: &SupportResponseEmail) -> Result<String, EmailError> {
        let template = self.env.get_template(SUPPORT_RESPONSE)?;
        Ok(template.render(email)?)
    }

    pub fn submission_update(&self, email: &SubmissionUpdateEmail) -> Result<String, EmailError> {
        let template = self.env.get_template(SUBMISSION_UPDATE)?;
        Ok(template.render(email)?)
    }
}
