use anyhow::{ensure, Context};
use clap::Subcommand;
use tracehold_config::Config;
use tracehold_email_contracts::{ContentType, Email, EmailService};
use tracehold_models::email_address::EmailAddressWithName;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
    /// Check that the smtp server accepts connections
    Ping,
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let email_service =
            email::connect(&config.email).context("Failed to create smtp transport")?;

        match self {
            EmailCommand::Test { recipient } => test(&email_service, recipient).await,
            EmailCommand::Ping => email_service
                .ping()
                .await
                .context("Failed to connect to smtp server"),
        }
    }
}

async fn test(email_service: &impl EmailService, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let ok = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await?;

    ensure!(ok, "Failed to send email");

    Ok(())
}
