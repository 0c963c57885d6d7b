use tracehold_config::{EmailConfig, EmailSecurity};
use tracehold_email_impl::{EmailServiceImpl, SmtpSecurity, SmtpSettings};

/// Create the pooled smtp transport. Connections are opened lazily.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(&smtp_settings(config), config.from.clone())
}

fn smtp_settings(config: &EmailConfig) -> SmtpSettings {
    SmtpSettings {
        host: config.host.clone(),
        port: config.port,
        username: config.username.clone(),
        password: config.password.clone(),
        security: match config.security {
            EmailSecurity::Tls => SmtpSecurity::Tls,
            EmailSecurity::Starttls => SmtpSecurity::StartTls,
            EmailSecurity::None => SmtpSecurity::None,
        },
    }
}
