//! Client side of the inspection request: field state bound to the shared
//! schema, one request per submit, feedback through [`Notifications`].

mod api;
mod notify;

use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::{validate_field, Ack, ContactInput, Field, FieldErrors, ValidContact};

pub use api::{ApiError, ContactApi, HttpContactApi, FALLBACK_MESSAGE};
pub use notify::{Notice, Notifications, Variant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("no submission is in flight")]
    NotSubmitting,

    #[error("invalid input: {0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug)]
pub struct ContactForm {
    input: ContactInput,
    errors: FieldErrors,
    state: FormState,
}

impl Default for ContactForm {
    fn default() -> Self {
        ContactForm::new()
    }
}

impl ContactForm {
    pub fn new() -> ContactForm {
        ContactForm {
            input: ContactForm::blank(),
            errors: FieldErrors::default(),
            state: FormState::Idle,
        }
    }

    fn blank() -> ContactInput {
        ContactInput {
            email: Some(String::new()),
            ..ContactInput::default()
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == FormState::Idle
    }

    pub fn value(&self, field: Field) -> &str {
        self.input.get(field).unwrap_or_default()
    }

    pub fn input(&self) -> &ContactInput {
        &self.input
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field).and_then(|messages| messages.first()).map(String::as_str)
    }

    /// Records an edit and re-checks that one field. Never blocks anything.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.input.set(field, value.into());
        self.errors.clear_field(field);
        if let Some(message) = validate_field(field, self.input.get(field)) {
            self.errors.add(field, message);
        }
    }

    /// Validates the whole record and, if it passes, marks the form as submitting.
    pub fn begin_submit(&mut self) -> Result<ValidContact, SubmitError> {
        if self.state == FormState::Submitting {
            return Err(SubmitError::InFlight);
        }

        match self.input.validate() {
            Ok(contact) => {
                self.errors.clear();
                self.state = FormState::Submitting;
                Ok(contact)
            }
            Err(errors) => {
                debug!("submit blocked on {} field(s)", errors.len());
                self.errors = errors.clone();
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Applies the server's answer and returns the form to idle.
    pub fn finish_submit(
        &mut self,
        result: Result<Ack, ApiError>,
        notices: &mut Notifications,
    ) -> Result<Ack, SubmitError> {
        if self.state != FormState::Submitting {
            return Err(SubmitError::NotSubmitting);
        }
        self.state = FormState::Idle;

        match result {
            Ok(ack) => {
                notices.success(ack.message.clone());
                self.reset();
                Ok(ack)
            }
            Err(err) => {
                warn!("contact submission failed: {err}");
                notices.error(err.user_message());
                Err(err.into())
            }
        }
    }

    pub async fn submit<A: ContactApi>(
        &mut self,
        api: &A,
        notices: &mut Notifications,
    ) -> Result<Ack, SubmitError> {
        let contact = self.begin_submit()?;
        let result = api.create_contact(&contact).await;
        self.finish_submit(result, notices)
    }

    pub fn reset(&mut self) {
        self.input = ContactForm::blank();
        self.errors.clear();
    }
}
