use std::{future::Future, net::IpAddr, sync::Arc};

use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CaptchaService: Send + Sync + 'static {
    /// Returns the public sitekey the frontend needs to render the challenge.
    fn get_sitekey(&self) -> Arc<str>;

    /// Verify a challenge token solved by the client at `remote_ip`.
    fn check(
        &self,
        token: &str,
        remote_ip: Option<IpAddr>,
    ) -> impl Future<Output = Result<(), CaptchaCheckError>> + Send;
}

#[derive(Debug, Error)]
pub enum CaptchaCheckError {
    #[error("The captcha token is invalid or has already been used.")]
    Failed,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockCaptchaService {
    pub fn with_get_sitekey(mut self, sitekey: &str) -> Self {
        self.expect_get_sitekey()
            .once()
            .return_const(Arc::<str>::from(sitekey));
        self
    }

    pub fn with_check(
        mut self,
        token: String,
        remote_ip: Option<IpAddr>,
        result: Result<(), CaptchaCheckError>,
    ) -> Self {
        self.expect_check()
            .once()
            .with(
                mockall::predicate::eq(token),
                mockall::predicate::eq(remote_ip),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
