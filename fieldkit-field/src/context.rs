//! Collaborators shared by field instances.

use crate::config::FieldConfig;
use crate::registry::SectionRegistry;
use crate::translate::{Passthrough, Translator};
use fieldkit_db::StorageGateway;
use std::sync::Arc;

/// The collaborators a field instance works against, handed in explicitly
/// at construction. Cloning is cheap: every member is shared.
#[derive(Clone)]
pub struct FieldContext {
    pub gateway: Arc<dyn StorageGateway>,
    pub sections: Arc<dyn SectionRegistry>,
    pub translator: Arc<dyn Translator>,
    pub config: Arc<FieldConfig>,
}

impl FieldContext {
    /// Context with the passthrough translator and default configuration.
    pub fn new(gateway: Arc<dyn StorageGateway>, sections: Arc<dyn SectionRegistry>) -> Self {
        Self {
            gateway,
            sections,
            translator: Arc::new(Passthrough),
            config: Arc::new(FieldConfig::default()),
        }
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Shorthand for `translator.translate`.
    pub fn t(&self, key: &str, args: &[&str]) -> String {
        self.translator.translate(key, args)
    }
}
