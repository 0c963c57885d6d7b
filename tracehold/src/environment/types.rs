use tracehold_core_calculator_impl::CalculatorFeatureServiceImpl;
use tracehold_core_config_impl::ConfigFeatureServiceImpl;
use tracehold_core_contact_impl::ContactFeatureServiceImpl;
use tracehold_core_health_impl::HealthFeatureServiceImpl;
use tracehold_email_impl::{template::TemplateEmailServiceImpl, EmailServiceImpl};
use tracehold_extern_impl::turnstile::TurnstileApiServiceImpl;
use tracehold_shared_impl::{
    captcha::CaptchaServiceImpl, rate_limit::RateLimitServiceImpl, time::TimeServiceImpl,
};
use tracehold_templates_impl::TemplateServiceImpl;

// API
pub type RestServer =
    tracehold_api_rest::RestServer<HealthFeature, ConfigFeature, ContactFeature, CalculatorFeature>;

// Email
pub type Email = EmailServiceImpl;
pub type TemplateEmail = TemplateEmailServiceImpl<Email, Template>;

// Extern
pub type TurnstileApi = TurnstileApiServiceImpl;

// Template
pub type Template = TemplateServiceImpl;

// Shared
pub type Captcha = CaptchaServiceImpl<TurnstileApi>;
pub type RateLimit = RateLimitServiceImpl<Time>;
pub type Time = TimeServiceImpl;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;

pub type ConfigFeature = ConfigFeatureServiceImpl<Captcha>;

pub type ContactFeature = ContactFeatureServiceImpl<Time, Captcha, RateLimit, TemplateEmail>;

pub type CalculatorFeature = CalculatorFeatureServiceImpl;
