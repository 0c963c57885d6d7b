use std::sync::Arc;

use tracehold_demo::contact::{MARCO, MARCO_SUBMITTED_AT};
use tracehold_email_contracts::template::MockTemplateEmailService;
use tracehold_models::{contact::DeliveryPolicy, email_address::EmailAddressWithName};
use tracehold_shared_contracts::{
    captcha::MockCaptchaService, rate_limit::MockRateLimitService, time::MockTimeService,
};
use tracehold_templates_contracts::{ContactConfirmationTemplate, OwnerNotificationTemplate};

use crate::{ContactFeatureConfig, ContactFeatureServiceImpl};

mod submit;

type Sut = ContactFeatureServiceImpl<
    MockTimeService,
    MockCaptchaService,
    MockRateLimitService,
    MockTemplateEmailService,
>;

impl Default for ContactFeatureConfig {
    fn default() -> Self {
        Self {
            owner_email: Arc::new("Tracehold <owner@tracehold.com>".parse().unwrap()),
            website_url: "https://tracehold.com/".into(),
            delivery_policy: DeliveryPolicy::RequireAll,
        }
    }
}

fn marco_mailbox() -> EmailAddressWithName {
    MARCO.email.clone().with_name("Marco Rossi".into())
}

fn marco_owner_notification() -> OwnerNotificationTemplate {
    OwnerNotificationTemplate {
        name: "Marco Rossi".into(),
        email: "marco.rossi@example.com".into(),
        company: Some("Rossi Shipping".into()),
        message: "We handle around 120 TEUs per month and would like a demo.".into(),
        gdpr_consent: true,
        submitted_at: "2025-03-14 09:26:53 UTC".into(),
    }
}

fn marco_confirmation() -> ContactConfirmationTemplate {
    ContactConfirmationTemplate {
        name: "Marco Rossi".into(),
        email: "marco.rossi@example.com".into(),
        website_url: "https://tracehold.com/".into(),
        year: 2025,
    }
}

fn marco_time() -> MockTimeService {
    MockTimeService::new().with_now(*MARCO_SUBMITTED_AT)
}
