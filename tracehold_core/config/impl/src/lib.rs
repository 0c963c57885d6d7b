use std::sync::Arc;

use tracehold_core_config_contracts::ConfigFeatureService;
use tracehold_di::Build;
use tracehold_shared_contracts::captcha::CaptchaService;

#[derive(Debug, Clone, Build)]
pub struct ConfigFeatureServiceImpl<Captcha> {
    captcha: Captcha,
}

impl<Captcha> ConfigFeatureService for ConfigFeatureServiceImpl<Captcha>
where
    Captcha: CaptchaService,
{
    fn get_captcha_sitekey(&self) -> Arc<str> {
        self.captcha.get_sitekey()
    }
}
