// Contact form: validate, post as JSON, report back inline
use hypernet_core::{
    validate, Clock, ContactForm, HttpClient, Request, SubmissionLog, SubmissionRecord,
    ValidationError,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};
use url::Url;

pub const SENDING_LABEL: &str = "Sending...";
pub const SUCCESS_MESSAGE: &str = "Thank you! We'll be in touch soon.";
pub const FAILURE_MESSAGE: &str =
    "Unable to send message. Please try again or contact hello@hypernet.unity";

/// How long an inline message stays up before it is hidden again
pub const MESSAGE_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    /// Class list for the message element
    pub fn css_class(&self) -> &'static str {
        match self {
            MessageKind::Success => "form-message form-message-success",
            MessageKind::Error => "form-message form-message-error",
        }
    }
}

/// The bits of the form the handler touches
#[cfg_attr(test, mockall::automock)]
pub trait FormView: Send {
    fn show_message(&mut self, message: &str, kind: MessageKind);
    fn hide_message(&mut self);
    fn submit_label(&self) -> String;
    fn set_submit(&mut self, label: &str, disabled: bool);
    /// Clear every field
    fn reset(&mut self);
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Rejected before any request went out
    Invalid(ValidationError),
    Sent(SubmissionRecord),
    /// Transport failure or non-2xx; nothing was stored
    Failed,
}

pub struct ContactFormHandler {
    endpoint: Url,
    network: Arc<dyn HttpClient>,
    submissions: SubmissionLog,
    clock: Arc<dyn Clock>,
}

impl ContactFormHandler {
    pub fn new(
        endpoint: Url,
        network: Arc<dyn HttpClient>,
        submissions: SubmissionLog,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            endpoint,
            network,
            submissions,
            clock,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Handle one submit
    ///
    /// No retry here. Anything that fails is the user's call to resend.
    pub async fn submit(&self, view: &mut dyn FormView, form: &ContactForm) -> SubmitOutcome {
        if let Err(e) = validate(form) {
            view.show_message(&e.to_string(), MessageKind::Error);
            return SubmitOutcome::Invalid(e);
        }

        let record = SubmissionRecord::from_form(form, self.clock.now());

        let original_label = view.submit_label();
        view.set_submit(SENDING_LABEL, true);

        let outcome = self.post(&record).await;
        match &outcome {
            SubmitOutcome::Sent(record) => {
                view.show_message(SUCCESS_MESSAGE, MessageKind::Success);
                view.reset();
                if let Err(e) = self.submissions.append(record.clone()) {
                    warn!("Local storage not available: {}", e);
                }
            }
            _ => view.show_message(FAILURE_MESSAGE, MessageKind::Error),
        }

        view.set_submit(&original_label, false);
        outcome
    }

    async fn post(&self, record: &SubmissionRecord) -> SubmitOutcome {
        let request = match Request::post_json(self.endpoint.clone(), record) {
            Ok(request) => request,
            Err(e) => {
                error!("Error: {}", e);
                return SubmitOutcome::Failed;
            }
        };

        match self.network.send(&request).await {
            Ok(response) if response.ok() => SubmitOutcome::Sent(record.clone()),
            Ok(response) => {
                error!("Error: Form submission failed with status {}", response.status);
                SubmitOutcome::Failed
            }
            Err(e) => {
                error!("Error: {}", e);
                SubmitOutcome::Failed
            }
        }
    }
}
