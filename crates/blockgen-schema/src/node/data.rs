use crate::prelude::*;

///
/// Data
///
/// A field bound to a runtime variable.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub key: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
    pub description: String,
    pub deprecated: bool,
    pub deprecated_reason: String,
    pub value: String,

    #[serde(skip)]
    pub default: Option<PrimitiveValue>,
}
