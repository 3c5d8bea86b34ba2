use crate::prelude::*;

///
/// Property
///
/// A configurable, typically static field. `value` is the string-encoded
/// default.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
    pub description: String,
    pub deprecated: bool,
    pub deprecated_reason: String,
    pub value_picker: ValuePicker,
    pub value_picker_group: String,
    pub value_picker_options: Vec<PickerOption>,

    /// Decoded default baked into generated adapters.
    #[serde(skip)]
    pub default: Option<PrimitiveValue>,

    /// Rust type decoded through the runtime's converter registry.
    #[serde(skip)]
    pub converter: Option<String>,
}

///
/// PickerOption
///

#[derive(Clone, Debug, Deserialize, Eq, FromMeta, PartialEq, Serialize)]
pub struct PickerOption {
    pub id: String,
    pub text: String,
}
