use std::sync::Arc;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ConfigFeatureService: Send + Sync + 'static {
    /// Returns the public sitekey of the captcha widget.
    fn get_captcha_sitekey(&self) -> Arc<str>;
}

#[cfg(feature = "mock")]
impl MockConfigFeatureService {
    pub fn with_get_captcha_sitekey(mut self, sitekey: &str) -> Self {
        self.expect_get_captcha_sitekey()
            .once()
            .return_const(Arc::<str>::from(sitekey));
        self
    }
}
