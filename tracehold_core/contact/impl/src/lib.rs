use std::{net::IpAddr, sync::Arc};

use chrono::Datelike;
use serde_json::Value;
use tracehold_core_contact_contracts::{
    ContactFeatureService, ContactSubmitError, DeliveryOutcome, DeliveryReport,
};
use tracehold_di::Build;
use tracehold_email_contracts::template::TemplateEmailService;
use tracehold_models::{
    contact::{ContactSubmission, DeliveryPolicy, ReceivedContactSubmission},
    email_address::EmailAddressWithName,
};
use tracehold_shared_contracts::{
    captcha::{CaptchaCheckError, CaptchaService},
    rate_limit::RateLimitService,
    time::TimeService,
};
use tracehold_templates_contracts::{ContactConfirmationTemplate, OwnerNotificationTemplate};
use tracehold_utils::trace_instrument;
use tracing::{error, warn};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Build)]
#[cfg_attr(test, derive(Default))]
pub struct ContactFeatureServiceImpl<Time, Captcha, RateLimit, TemplateEmail> {
    time: Time,
    captcha: Captcha,
    rate_limit: RateLimit,
    template_email: TemplateEmail,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Recipient of the owner notifications.
    pub owner_email: Arc<EmailAddressWithName>,
    /// Linked from the confirmation email.
    pub website_url: Arc<str>,
    pub delivery_policy: DeliveryPolicy,
}

impl<Time, Captcha, RateLimit, TemplateEmail> ContactFeatureService
    for ContactFeatureServiceImpl<Time, Captcha, RateLimit, TemplateEmail>
where
    Time: TimeService,
    Captcha: CaptchaService,
    RateLimit: RateLimitService,
    TemplateEmail: TemplateEmailService,
{
    #[trace_instrument(skip(self, raw))]
    async fn submit(&self, raw: Value, client_ip: Option<IpAddr>) -> Result<(), ContactSubmitError> {
        let submission = ContactSubmission::parse(&raw)?;

        if !self.rate_limit.acquire(client_ip).await {
            return Err(ContactSubmitError::RateLimited);
        }

        match self.captcha.check(&submission.captcha_token, client_ip).await {
            Ok(()) => {}
            Err(CaptchaCheckError::Failed) => return Err(ContactSubmitError::Captcha),
            Err(CaptchaCheckError::Other(err)) => {
                warn!("Failed to verify captcha token: {err:#}");
                return Err(ContactSubmitError::Captcha);
            }
        }

        let received = ReceivedContactSubmission {
            submission,
            submitted_at: self.time.now(),
        };

        let report = self.notify(&received).await;

        if !report.satisfies(self.config.delivery_policy) {
            return Err(ContactSubmitError::Delivery(report));
        }

        if !report.owner_notification.is_sent() {
            error!(
                submitter = received.submission.email.as_str(),
                "Owner notification was not delivered, accepting submission anyway"
            );
        }

        Ok(())
    }
}

impl<Time, Captcha, RateLimit, TemplateEmail>
    ContactFeatureServiceImpl<Time, Captcha, RateLimit, TemplateEmail>
where
    TemplateEmail: TemplateEmailService,
{
    /// Send the owner notification and the confirmation concurrently and wait
    /// for both.
    async fn notify(&self, received: &ReceivedContactSubmission) -> DeliveryReport {
        let submission = &received.submission;
        let name = String::clone(&submission.name);
        let email = submission.email.as_str().to_owned();
        let submitter = submission.email.clone().with_name(name.clone());

        let owner_notification = OwnerNotificationTemplate {
            name: name.clone(),
            email: email.clone(),
            company: submission.company.as_deref().cloned(),
            message: String::clone(&submission.message),
            gdpr_consent: submission.gdpr_consent,
            submitted_at: received
                .submitted_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        };

        let confirmation = ContactConfirmationTemplate {
            name,
            email,
            website_url: self.config.website_url.to_string(),
            year: received.submitted_at.year(),
        };

        let (owner_notification, confirmation) = tokio::join!(
            self.template_email.send_owner_notification(
                (*self.config.owner_email).clone(),
                &owner_notification,
                submitter.clone(),
            ),
            self.template_email
                .send_contact_confirmation(submitter, &confirmation),
        );

        DeliveryReport {
            owner_notification: outcome("owner notification", owner_notification),
            confirmation: outcome("confirmation", confirmation),
        }
    }
}

fn outcome(email: &str, result: anyhow::Result<bool>) -> DeliveryOutcome {
    match result {
        Ok(true) => DeliveryOutcome::Sent,
        Ok(false) => {
            error!("The smtp server rejected the {email} email");
            DeliveryOutcome::Rejected
        }
        Err(err) => {
            error!("Failed to send {email} email: {err:#}");
            DeliveryOutcome::Failed
        }
    }
}
