use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    /// Name of the template. Ends in `.html` so that autoescaping applies.
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE_NAME: &str = "base.html";
pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    OwnerNotificationTemplate("owner_notification.html"),
    ContactConfirmationTemplate("contact_confirmation.html"),
}

/// Sent to the site owner for every accepted contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerNotificationTemplate {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub gdpr_consent: bool,
    /// Human readable submission time.
    pub submitted_at: String,
}

/// Sent to the submitter to confirm that the message has been received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactConfirmationTemplate {
    pub name: String,
    pub email: String,
    pub website_url: String,
    pub year: i32,
}
