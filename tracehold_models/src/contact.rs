use std::{fmt::Display, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{email_address::EmailAddress, macros::nutype_string, ConstraintViolations};

pub static CONTACT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());

/// A validated submission of the contact form.
///
/// Only obtainable through [`ContactSubmission::parse`], so holding one means
/// every field satisfied its constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub company: Option<ContactCompany>,
    pub message: ContactMessageContent,
    pub gdpr_consent: bool,
    pub captcha_token: CaptchaToken,
}

/// A submission together with the data the server adds to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedContactSubmission {
    pub submission: ContactSubmission,
    pub submitted_at: DateTime<Utc>,
}

/// Decides which failed notification emails fail a contact submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Both the owner notification and the confirmation must be delivered.
    #[default]
    RequireAll,
    /// Only the confirmation to the submitter must be delivered. A failed
    /// owner notification is logged.
    RequireConfirmation,
}

nutype_string!(ContactName(validate(
    with = validate_contact_name,
    error = ConstraintViolations
)));

nutype_string!(ContactCompany(validate(
    with = validate_contact_company,
    error = ConstraintViolations
)));

nutype_string!(ContactMessageContent(validate(
    with = validate_contact_message_content,
    error = ConstraintViolations
)));

nutype_string!(
    /// Opaque token produced by the client-side challenge widget.
    CaptchaToken(validate(with = validate_captcha_token, error = ConstraintViolations))
);

fn validate_contact_name(name: &str) -> Result<(), ConstraintViolations> {
    let len = name.chars().count();
    ConstraintViolations::check([
        (len >= 2, "Name must be at least 2 characters"),
        (len <= 100, "Name must be at most 100 characters"),
        (
            CONTACT_NAME_REGEX.is_match(name),
            "Name can only contain letters and spaces",
        ),
    ])
}

fn validate_contact_company(company: &str) -> Result<(), ConstraintViolations> {
    let len = company.chars().count();
    ConstraintViolations::check([
        (len >= 2, "Company name must be at least 2 characters"),
        (len <= 200, "Company name must be at most 200 characters"),
    ])
}

fn validate_contact_message_content(message: &str) -> Result<(), ConstraintViolations> {
    let len = message.chars().count();
    ConstraintViolations::check([
        (len >= 10, "Message must be at least 10 characters"),
        (len <= 2000, "Message must be at most 2000 characters"),
    ])
}

fn validate_captcha_token(token: &str) -> Result<(), ConstraintViolations> {
    ConstraintViolations::check([(
        !token.is_empty(),
        "Please complete the captcha verification",
    )])
}

fn validate_email(email: &str) -> Result<EmailAddress, ConstraintViolations> {
    let parsed = email.parse::<EmailAddress>();
    ConstraintViolations::check([
        (parsed.is_ok(), "Please enter a valid email address"),
        (
            email.chars().count() <= EmailAddress::MAX_LENGTH,
            "Email must be at most 255 characters",
        ),
    ])?;
    parsed.map_err(|_| ConstraintViolations(vec!["Please enter a valid email address"]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactField {
    Name,
    Email,
    Company,
    Message,
    GdprConsent,
    CaptchaToken,
}

impl ContactField {
    /// The name of the field in the JSON payload.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Message => "message",
            Self::GdprConsent => "gdprConsent",
            Self::CaptchaToken => "captchaToken",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// `None` if the payload as a whole is malformed.
    pub field: Option<ContactField>,
    pub message: &'static str,
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.field {
            Some(field) => write!(f, "{}: {}", field.key(), self.message),
            None => f.write_str(self.message),
        }
    }
}

/// Every constraint a contact form payload failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ContactSubmissionViolations(pub Vec<FieldViolation>);

impl Display for ContactSubmissionViolations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            violation.fmt(f)?;
        }
        Ok(())
    }
}

impl ContactSubmission {
    /// Validate an untrusted JSON payload.
    ///
    /// Unknown keys are ignored. `company` may be absent, but if present it
    /// must be a valid company name.
    pub fn parse(raw: &Value) -> Result<Self, ContactSubmissionViolations> {
        let Some(object) = raw.as_object() else {
            return Err(ContactSubmissionViolations(vec![FieldViolation {
                field: None,
                message: "Expected a JSON object",
            }]));
        };

        let mut collector = Collector {
            object,
            violations: Vec::new(),
        };

        let name = collector
            .required_string(ContactField::Name)
            .and_then(|x| collector.validated(ContactField::Name, ContactName::try_from(x)));
        let email = collector
            .required_string(ContactField::Email)
            .and_then(|x| collector.validated(ContactField::Email, validate_email(&x)));
        let company = collector.optional_string(ContactField::Company).map(|x| {
            x.and_then(|x| collector.validated(ContactField::Company, ContactCompany::try_from(x)))
        });
        let message = collector
            .required_string(ContactField::Message)
            .and_then(|x| {
                collector.validated(ContactField::Message, ContactMessageContent::try_from(x))
            });
        let gdpr_consent = collector.gdpr_consent();
        let captcha_token = collector
            .required_string(ContactField::CaptchaToken)
            .and_then(|x| collector.validated(ContactField::CaptchaToken, CaptchaToken::try_from(x)));

        match (name, email, company, message, gdpr_consent, captcha_token) {
            (
                Some(name),
                Some(email),
                Some(company),
                Some(message),
                Some(gdpr_consent),
                Some(captcha_token),
            ) if collector.violations.is_empty() => Ok(Self {
                name,
                email,
                company,
                message,
                gdpr_consent,
                captcha_token,
            }),
            _ => Err(ContactSubmissionViolations(collector.violations)),
        }
    }
}

struct Collector<'a> {
    object: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl Collector<'_> {
    fn push(&mut self, field: ContactField, message: &'static str) {
        self.violations.push(FieldViolation {
            field: Some(field),
            message,
        });
    }

    fn required_string(&mut self, field: ContactField) -> Option<String> {
        match self.object.get(field.key()) {
            Some(Value::String(x)) => Some(x.clone()),
            None => {
                self.push(field, "Required");
                None
            }
            Some(_) => {
                self.push(field, "Expected a string");
                None
            }
        }
    }

    /// Returns `Some(None)` if the field is absent. `null` is not absent.
    fn optional_string(&mut self, field: ContactField) -> Option<Option<String>> {
        match self.object.get(field.key()) {
            None => Some(None),
            Some(Value::String(x)) => Some(Some(x.clone())),
            Some(_) => {
                self.push(field, "Expected a string");
                None
            }
        }
    }

    fn gdpr_consent(&mut self) -> Option<bool> {
        let field = ContactField::GdprConsent;
        match self.object.get(field.key()) {
            Some(Value::Bool(true)) => Some(true),
            Some(Value::Bool(false)) => {
                self.push(field, "You must accept the privacy policy");
                None
            }
            None => {
                self.push(field, "Required");
                None
            }
            Some(_) => {
                self.push(field, "Expected a boolean");
                None
            }
        }
    }

    fn validated<T>(
        &mut self,
        field: ContactField,
        result: Result<T, ConstraintViolations>,
    ) -> Option<T> {
        result
            .map_err(|ConstraintViolations(messages)| {
                for message in messages {
                    self.push(field, message);
                }
            })
            .ok()
    }
}
