//! Form session DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use domain_quote::{FormData, FormSession, Step, FORM_VERSION, TOTAL_STEPS};

/// The state of a user's form as shown to the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub version: &'static str,
    pub step: Step,
    pub step_title: &'static str,
    pub total_steps: u8,
    pub progress_percent: u8,
    pub is_quote_step: bool,
    pub data: FormData,
    pub updated_at: DateTime<Utc>,
}

impl From<FormSession> for SessionResponse {
    fn from(session: FormSession) -> Self {
        Self {
            version: FORM_VERSION,
            step: session.step(),
            step_title: session.step().title(),
            total_steps: TOTAL_STEPS,
            progress_percent: session.progress_percent(),
            is_quote_step: session.is_quote_step(),
            updated_at: session.updated_at(),
            data: session.snapshot(),
        }
    }
}
