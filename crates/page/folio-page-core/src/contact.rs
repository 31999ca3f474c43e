//! Contact form state and its submit cycle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_form_relay::{FormPayload, FormRelay, RelayError, RelayReceipt};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),

    #[error("field '{0}' is required")]
    EmptyField(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("a submission is already in flight")]
    AlreadySubmitting,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Minimal shape check: `local@domain.tld` with no whitespace.
fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[derive(Debug, Default)]
pub struct ContactForm {
    fields: FormFields,
    status: SubmitStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), ContactError> {
        let slot = match field {
            "name" => &mut self.fields.name,
            "email" => &mut self.fields.email,
            "message" => &mut self.fields.message,
            other => return Err(ContactError::UnknownField(other.to_string())),
        };
        *slot = value.into();
        Ok(())
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.fields.name),
            "email" => Some(&self.fields.email),
            "message" => Some(&self.fields.message),
            _ => None,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// Validate and enter Submitting. The returned payload is what the
    /// caller posts; report the outcome with [`ContactForm::finish_submit`].
    /// A validation failure is recorded as [`SubmitStatus::Failed`].
    pub fn begin_submit(&mut self) -> Result<FormPayload, ContactError> {
        if self.is_submitting() {
            return Err(ContactError::AlreadySubmitting);
        }
        match self.payload() {
            Ok(payload) => {
                self.status = SubmitStatus::Submitting;
                Ok(payload)
            }
            Err(err) => {
                log::warn!("contact: {err}");
                self.status = SubmitStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    fn payload(&self) -> Result<FormPayload, ContactError> {
        let f = &self.fields;
        for (name, value) in [("name", &f.name), ("email", &f.email), ("message", &f.message)] {
            if value.trim().is_empty() {
                return Err(ContactError::EmptyField(name));
            }
        }
        if !is_email(f.email.trim()) {
            return Err(ContactError::InvalidEmail(f.email.clone()));
        }
        Ok(FormPayload::new(f.name.trim(), f.email.trim(), f.message.trim()))
    }

    /// Success clears every field. Failure keeps them and records the
    /// reason.
    pub fn finish_submit(&mut self, result: Result<RelayReceipt, RelayError>) -> &SubmitStatus {
        if !self.is_submitting() {
            log::warn!("contact: submit result arrived with no submission in flight");
            return &self.status;
        }
        self.status = match result {
            Ok(receipt) => {
                log::info!("contact: submitted (status {})", receipt.status);
                self.fields = FormFields::default();
                SubmitStatus::Succeeded
            }
            Err(err) => {
                log::error!("contact: submission failed: {err}");
                SubmitStatus::Failed(err.to_string())
            }
        };
        &self.status
    }

    /// Whole cycle against `relay`. Never returns an error; the outcome
    /// is the resulting status.
    pub async fn submit(&mut self, relay: &dyn FormRelay) -> SubmitStatus {
        let Ok(payload) = self.begin_submit() else {
            return self.status.clone();
        };
        log::debug!("contact: posting to {}", relay.endpoint());
        let result = relay.submit(&payload).await;
        self.finish_submit(result).clone()
    }
}
