use tracehold_di::Build;
use tracehold_email_contracts::{template::TemplateEmailService, ContentType, Email, EmailService};
use tracehold_models::email_address::EmailAddressWithName;
use tracehold_templates_contracts::{
    ContactConfirmationTemplate, OwnerNotificationTemplate, Template, TemplateService,
};
use tracehold_utils::trace_instrument;

const CONTACT_CONFIRMATION_SUBJECT: &str = "Thank you for contacting Tracehold";

#[derive(Debug, Clone, Build)]
pub struct TemplateEmailServiceImpl<Email, Template> {
    email: Email,
    template: Template,
}

impl<EmailS, Template> TemplateEmailService for TemplateEmailServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    #[trace_instrument(skip(self, data))]
    async fn send_owner_notification(
        &self,
        recipient: EmailAddressWithName,
        data: &OwnerNotificationTemplate,
        reply_to: EmailAddressWithName,
    ) -> anyhow::Result<bool> {
        let subject = format!("New Lead from {} - Tracehold Contact Form", data.name);
        self.send_email(recipient, data, subject, Some(reply_to))
            .await
    }

    #[trace_instrument(skip(self, data))]
    async fn send_contact_confirmation(
        &self,
        recipient: EmailAddressWithName,
        data: &ContactConfirmationTemplate,
    ) -> anyhow::Result<bool> {
        self.send_email(recipient, data, CONTACT_CONFIRMATION_SUBJECT, None)
            .await
    }
}

impl<EmailS, TemplateS> TemplateEmailServiceImpl<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn send_email<T: Template + 'static>(
        &self,
        recipient: EmailAddressWithName,
        data: &T,
        subject: impl Into<String>,
        reply_to: Option<EmailAddressWithName>,
    ) -> anyhow::Result<bool> {
        self.email
            .send(Email {
                recipient,
                subject: subject.into(),
                body: self.template.render(data)?,
                content_type: ContentType::Html,
                reply_to,
            })
            .await
    }
}
