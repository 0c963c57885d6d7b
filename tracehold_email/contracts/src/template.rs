use std::future::Future;

use tracehold_models::email_address::EmailAddressWithName;
use tracehold_templates_contracts::{ContactConfirmationTemplate, OwnerNotificationTemplate};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateEmailService: Send + Sync + 'static {
    /// Notify the site owner about a new lead. Replies go to `reply_to`.
    fn send_owner_notification(
        &self,
        recipient: EmailAddressWithName,
        data: &OwnerNotificationTemplate,
        reply_to: EmailAddressWithName,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;

    fn send_contact_confirmation(
        &self,
        recipient: EmailAddressWithName,
        data: &ContactConfirmationTemplate,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

#[cfg(feature = "mock")]
impl MockTemplateEmailService {
    pub fn with_send_owner_notification(
        mut self,
        recipient: EmailAddressWithName,
        data: OwnerNotificationTemplate,
        reply_to: EmailAddressWithName,
        result: bool,
    ) -> Self {
        self.expect_send_owner_notification()
            .once()
            .with(
                mockall::predicate::eq(recipient),
                mockall::predicate::eq(data),
                mockall::predicate::eq(reply_to),
            )
            .return_once(move |_, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_contact_confirmation(
        mut self,
        recipient: EmailAddressWithName,
        data: ContactConfirmationTemplate,
        result: bool,
    ) -> Self {
        self.expect_send_contact_confirmation()
            .once()
            .with(
                mockall::predicate::eq(recipient),
                mockall::predicate::eq(data),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
