use crate::prelude::*;

///
/// Event
///
/// A callback field. Only the name, description and deprecation pair are
/// published; the rest drives code generation.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event: String,
    pub description: String,
    pub deprecated: bool,
    pub deprecated_reason: String,

    #[serde(skip)]
    pub function_name: String,

    #[serde(skip)]
    pub data_binding: Vec<String>,

    #[serde(skip)]
    pub then: Then,
}

///
/// TESTS
///
