use std::{sync::Arc, time::Duration};

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::Barrier;
use tracehold_core_contact_contracts::{
    ContactFeatureService, ContactSubmitError, DeliveryOutcome, DeliveryReport,
};
use tracehold_demo::contact::{
    ANNA, ANNA_RAW, CAPTCHA_TOKEN, CLIENT_IP, MARCO_RAW, MARCO_SUBMITTED_AT,
};
use tracehold_email_contracts::template::MockTemplateEmailService;
use tracehold_models::{
    contact::{ContactField, DeliveryPolicy},
    email_address::EmailAddressWithName,
};
use tracehold_shared_contracts::{
    captcha::{CaptchaCheckError, MockCaptchaService},
    rate_limit::MockRateLimitService,
    time::MockTimeService,
};
use tracehold_templates_contracts::{ContactConfirmationTemplate, OwnerNotificationTemplate};
use tracehold_utils::assert_matches;

use super::{marco_confirmation, marco_mailbox, marco_owner_notification, marco_time, Sut};
use crate::{ContactFeatureConfig, ContactFeatureServiceImpl};

fn passing_gates() -> (MockRateLimitService, MockCaptchaService) {
    (
        MockRateLimitService::new().with_acquire(Some(CLIENT_IP), true),
        MockCaptchaService::new().with_check(CAPTCHA_TOKEN.into(), Some(CLIENT_IP), Ok(())),
    )
}

fn owner_email() -> EmailAddressWithName {
    (*ContactFeatureConfig::default().owner_email).clone()
}

#[tokio::test]
async fn ok() {
    // Arrange
    let (rate_limit, captcha) = passing_gates();

    let template_email = MockTemplateEmailService::new()
        .with_send_owner_notification(
            owner_email(),
            marco_owner_notification(),
            marco_mailbox(),
            true,
        )
        .with_send_contact_confirmation(marco_mailbox(), marco_confirmation(), true);

    let sut = ContactFeatureServiceImpl {
        time: marco_time(),
        captcha,
        rate_limit,
        template_email,
        ..Sut::default()
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    result.unwrap();
}

#[tokio::test]
async fn ok_without_company() {
    // Arrange
    let time = MockTimeService::new().with_now(*MARCO_SUBMITTED_AT);
    let rate_limit = MockRateLimitService::new().with_acquire(None, true);
    let captcha = MockCaptchaService::new().with_check(CAPTCHA_TOKEN.into(), None, Ok(()));

    let anna = ANNA.email.clone().with_name("Anna de Vries".into());
    let template_email = MockTemplateEmailService::new()
        .with_send_owner_notification(
            owner_email(),
            OwnerNotificationTemplate {
                name: "Anna de Vries".into(),
                email: "anna@example.nl".into(),
                company: None,
                message: "Please send me more information about the pilot program.".into(),
                gdpr_consent: true,
                submitted_at: "2025-03-14 09:26:53 UTC".into(),
            },
            anna.clone(),
            true,
        )
        .with_send_contact_confirmation(
            anna,
            ContactConfirmationTemplate {
                name: "Anna de Vries".into(),
                email: "anna@example.nl".into(),
                website_url: "https://tracehold.com/".into(),
                year: 2025,
            },
            true,
        );

    let sut = ContactFeatureServiceImpl {
        time,
        captcha,
        rate_limit,
        template_email,
        ..Sut::default()
    };

    // Act
    let result = sut.submit(ANNA_RAW.clone(), None).await;

    // Assert
    result.unwrap();
}

#[tokio::test]
async fn invalid_input_has_no_side_effects() {
    let mut payloads = Vec::new();
    for (key, value) in [
        ("name", json!("M")),
        ("name", json!("Marco Rossi 3rd")),
        ("name", json!("x".repeat(101))),
        ("email", json!("marco.rossi")),
        ("email", json!(format!("{}@example.com", "a".repeat(250)))),
        ("company", json!("R")),
        ("company", json!("")),
        ("company", json!(null)),
        ("name", json!("José Núñez")),
        ("company", json!("x".repeat(201))),
        ("message", json!("Too short")),
        ("message", json!("x".repeat(2001))),
        ("gdprConsent", json!(false)),
        ("gdprConsent", json!("true")),
        ("captchaToken", json!("")),
        ("captchaToken", json!(null)),
    ] {
        let mut payload = MARCO_RAW.clone();
        payload[key] = value;
        payloads.push(payload);
    }
    payloads.push(json!("not an object"));
    payloads.push(json!({}));

    for payload in payloads {
        // Arrange
        let sut = Sut::default();

        // Act
        let result = sut.submit(payload.clone(), Some(CLIENT_IP)).await;

        // Assert
        assert!(
            matches!(result, Err(ContactSubmitError::InvalidInput(_))),
            "{payload}: {result:?}"
        );
    }
}

#[tokio::test]
async fn invalid_input_lists_every_violation() {
    // Arrange
    let sut = Sut::default();
    let mut payload = MARCO_RAW.clone();
    payload["name"] = json!("1");
    payload["gdprConsent"] = json!(false);

    // Act
    let result = sut.submit(payload, Some(CLIENT_IP)).await;

    // Assert
    let Err(ContactSubmitError::InvalidInput(violations)) = result else {
        panic!("expected invalid input, got {result:?}");
    };
    let fields = violations
        .0
        .iter()
        .map(|violation| violation.field)
        .collect::<Vec<_>>();
    assert_eq!(
        fields,
        [
            Some(ContactField::Name),
            Some(ContactField::Name),
            Some(ContactField::GdprConsent),
        ]
    );
}

#[tokio::test]
async fn rate_limited() {
    // Arrange
    let rate_limit = MockRateLimitService::new().with_acquire(Some(CLIENT_IP), false);

    let sut = ContactFeatureServiceImpl {
        rate_limit,
        ..Sut::default()
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    assert_matches!(result, Err(ContactSubmitError::RateLimited));
}

#[tokio::test]
async fn captcha_failed() {
    // Arrange
    let rate_limit = MockRateLimitService::new().with_acquire(Some(CLIENT_IP), true);
    let captcha = MockCaptchaService::new().with_check(
        CAPTCHA_TOKEN.into(),
        Some(CLIENT_IP),
        Err(CaptchaCheckError::Failed),
    );

    let sut = ContactFeatureServiceImpl {
        captcha,
        rate_limit,
        ..Sut::default()
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    assert_matches!(result, Err(ContactSubmitError::Captcha));
}

#[tokio::test]
async fn captcha_unreachable() {
    // Arrange
    let rate_limit = MockRateLimitService::new().with_acquire(Some(CLIENT_IP), true);
    let captcha = MockCaptchaService::new().with_check(
        CAPTCHA_TOKEN.into(),
        Some(CLIENT_IP),
        Err(CaptchaCheckError::Other(anyhow::anyhow!("connection refused"))),
    );

    let sut = ContactFeatureServiceImpl {
        captcha,
        rate_limit,
        ..Sut::default()
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    assert_matches!(result, Err(ContactSubmitError::Captcha));
}

#[tokio::test]
async fn owner_notification_rejected() {
    // Arrange
    let (rate_limit, captcha) = passing_gates();

    let template_email = MockTemplateEmailService::new()
        .with_send_owner_notification(
            owner_email(),
            marco_owner_notification(),
            marco_mailbox(),
            false,
        )
        .with_send_contact_confirmation(marco_mailbox(), marco_confirmation(), true);

    let sut = ContactFeatureServiceImpl {
        time: marco_time(),
        captcha,
        rate_limit,
        template_email,
        ..Sut::default()
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactSubmitError::Delivery(DeliveryReport {
            owner_notification: DeliveryOutcome::Rejected,
            confirmation: DeliveryOutcome::Sent,
        }))
    );
}

#[tokio::test]
async fn notifications_are_sent_concurrently() {
    // Arrange
    let (rate_limit, captcha) = passing_gates();

    // neither send completes until both are in flight
    let barrier = Arc::new(Barrier::new(2));
    let mut template_email = MockTemplateEmailService::new();
    template_email
        .expect_send_owner_notification()
        .once()
        .return_once({
            let barrier = Arc::clone(&barrier);
            move |_, _, _| {
                Box::pin(async move {
                    barrier.wait().await;
                    anyhow::Ok(true)
                })
            }
        });
    template_email
        .expect_send_contact_confirmation()
        .once()
        .return_once(move |_, _| {
            Box::pin(async move {
                barrier.wait().await;
                anyhow::Ok(true)
            })
        });

    let sut = ContactFeatureServiceImpl {
        time: marco_time(),
        captcha,
        rate_limit,
        template_email,
        ..Sut::default()
    };

    // Act
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)),
    )
    .await;

    // Assert
    result.expect("notifications were sent one after the other").unwrap();
}

#[tokio::test]
async fn confirmation_failed() {
    // Arrange
    let (rate_limit, captcha) = passing_gates();

    let mut template_email = MockTemplateEmailService::new().with_send_owner_notification(
        owner_email(),
        marco_owner_notification(),
        marco_mailbox(),
        true,
    );
    template_email
        .expect_send_contact_confirmation()
        .once()
        .return_once(|_, _| {
            Box::pin(std::future::ready(Err(anyhow::anyhow!(
                "connection refused"
            ))))
        });

    let sut = ContactFeatureServiceImpl {
        time: marco_time(),
        captcha,
        rate_limit,
        template_email,
        ..Sut::default()
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactSubmitError::Delivery(DeliveryReport {
            owner_notification: DeliveryOutcome::Sent,
            confirmation: DeliveryOutcome::Failed,
        }))
    );
}

#[tokio::test]
async fn require_confirmation_tolerates_owner_notification_failure() {
    // Arrange
    let config = ContactFeatureConfig {
        delivery_policy: DeliveryPolicy::RequireConfirmation,
        ..Default::default()
    };

    let (rate_limit, captcha) = passing_gates();

    let template_email = MockTemplateEmailService::new()
        .with_send_owner_notification(
            owner_email(),
            marco_owner_notification(),
            marco_mailbox(),
            false,
        )
        .with_send_contact_confirmation(marco_mailbox(), marco_confirmation(), true);

    let sut = ContactFeatureServiceImpl {
        time: marco_time(),
        captcha,
        rate_limit,
        template_email,
        config,
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    result.unwrap();
}

#[tokio::test]
async fn require_confirmation_confirmation_rejected() {
    // Arrange
    let config = ContactFeatureConfig {
        delivery_policy: DeliveryPolicy::RequireConfirmation,
        ..Default::default()
    };

    let (rate_limit, captcha) = passing_gates();

    let template_email = MockTemplateEmailService::new()
        .with_send_owner_notification(
            owner_email(),
            marco_owner_notification(),
            marco_mailbox(),
            true,
        )
        .with_send_contact_confirmation(marco_mailbox(), marco_confirmation(), false);

    let sut = ContactFeatureServiceImpl {
        time: marco_time(),
        captcha,
        rate_limit,
        template_email,
        config,
    };

    // Act
    let result = sut.submit(MARCO_RAW.clone(), Some(CLIENT_IP)).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactSubmitError::Delivery(DeliveryReport {
            owner_notification: DeliveryOutcome::Sent,
            confirmation: DeliveryOutcome::Rejected,
        }))
    );
}
