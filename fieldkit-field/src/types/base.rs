use crate::field_type::FieldType;

/// The plain field: every behaviour is the contract default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseField;

impl FieldType for BaseField {
    fn handle(&self) -> &str {
        "field"
    }

    fn name(&self) -> &str {
        "Field"
    }
}
