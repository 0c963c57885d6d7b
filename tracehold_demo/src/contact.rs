use std::{
    net::{IpAddr, Ipv4Addr},
    sync::LazyLock,
};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tracehold_models::contact::{ContactSubmission, ReceivedContactSubmission};

pub const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

pub const CAPTCHA_TOKEN: &str = "0.zrSnRHO7h0HwSjSCU8oyzbjEtD8p.d62306d4ee00c77dda697f959ebbd7bd9";

/// The body the website posts for a typical lead.
pub static MARCO_RAW: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "name": "Marco Rossi",
        "email": "marco.rossi@example.com",
        "company": "Rossi Shipping",
        "message": "We handle around 120 TEUs per month and would like a demo.",
        "gdprConsent": true,
        "captchaToken": CAPTCHA_TOKEN,
    })
});

pub static MARCO: LazyLock<ContactSubmission> =
    LazyLock::new(|| ContactSubmission::parse(&MARCO_RAW).unwrap());

pub static MARCO_SUBMITTED_AT: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap());

pub static MARCO_RECEIVED: LazyLock<ReceivedContactSubmission> =
    LazyLock::new(|| ReceivedContactSubmission {
        submission: MARCO.clone(),
        submitted_at: *MARCO_SUBMITTED_AT,
    });

/// A lead that did not send the optional company field.
pub static ANNA_RAW: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "name": "Anna de Vries",
        "email": "anna@example.nl",
        "message": "Please send me more information about the pilot program.",
        "gdprConsent": true,
        "captchaToken": CAPTCHA_TOKEN,
    })
});

pub static ANNA: LazyLock<ContactSubmission> =
    LazyLock::new(|| ContactSubmission::parse(&ANNA_RAW).unwrap());
