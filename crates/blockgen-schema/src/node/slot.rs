use crate::prelude::*;

///
/// Slot
///
/// A named child-content extension point (blocks only).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub slot: String,
    pub description: String,
    pub deprecated: bool,
    pub deprecated_reason: String,
}
