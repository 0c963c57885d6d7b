use std::{future::Future, net::IpAddr};

use serde_json::Value;
use thiserror::Error;
use tracehold_models::contact::{ContactSubmissionViolations, DeliveryPolicy};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate a contact form submission, verify its captcha token and
    /// notify both the site owner and the submitter.
    ///
    /// `client_ip` is the address of the submitting client, if known.
    fn submit(
        &self,
        raw: Value,
        client_ip: Option<IpAddr>,
    ) -> impl Future<Output = Result<(), ContactSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Invalid form data: {0}")]
    InvalidInput(#[from] ContactSubmissionViolations),
    #[error("Too many requests.")]
    RateLimited,
    #[error("Captcha verification failed.")]
    Captcha,
    #[error("Failed to send message.")]
    Delivery(DeliveryReport),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSubmitErrorKind {
    InvalidInput,
    RateLimited,
    CaptchaFailed,
    DeliveryFailed,
    Internal,
}

impl ContactSubmitError {
    pub fn kind(&self) -> ContactSubmitErrorKind {
        match self {
            Self::InvalidInput(_) => ContactSubmitErrorKind::InvalidInput,
            Self::RateLimited => ContactSubmitErrorKind::RateLimited,
            Self::Captcha => ContactSubmitErrorKind::CaptchaFailed,
            Self::Delivery(_) => ContactSubmitErrorKind::DeliveryFailed,
            Self::Other(_) => ContactSubmitErrorKind::Internal,
        }
    }
}

impl ContactSubmitErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::RateLimited => "rate_limited",
            Self::CaptchaFailed => "captcha_failed",
            Self::DeliveryFailed => "delivery_failed",
            Self::Internal => "internal",
        }
    }
}

/// Outcome of both notification emails of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub owner_notification: DeliveryOutcome,
    pub confirmation: DeliveryOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// The smtp server did not accept the email.
    Rejected,
    /// The email could not be rendered or the smtp server was unreachable.
    Failed,
}

impl DeliveryOutcome {
    pub fn is_sent(self) -> bool {
        self == Self::Sent
    }
}

impl DeliveryReport {
    /// Whether the submission counts as delivered under `policy`.
    pub fn satisfies(&self, policy: DeliveryPolicy) -> bool {
        match policy {
            DeliveryPolicy::RequireAll => {
                self.owner_notification.is_sent() && self.confirmation.is_sent()
            }
            DeliveryPolicy::RequireConfirmation => self.confirmation.is_sent(),
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        raw: Value,
        client_ip: Option<IpAddr>,
        result: Result<(), ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(
                mockall::predicate::eq(raw),
                mockall::predicate::eq(client_ip),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
