use std::sync::Arc;

use tera::Tera;
use tracehold_di::Build;
use tracehold_templates_contracts::{
    Template, TemplateService, BASE_TEMPLATE, BASE_TEMPLATE_NAME, TEMPLATES,
};

#[derive(Debug, Clone, Build)]
pub struct TemplateServiceImpl {
    #[state]
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();

        // the base template must be known before any template extending it
        tera.add_raw_template(BASE_TEMPLATE_NAME, BASE_TEMPLATE).unwrap();

        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template).unwrap();
        }

        Self(tera.into())
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.state.0.render(T::NAME, &context).map_err(Into::into)
    }
}
