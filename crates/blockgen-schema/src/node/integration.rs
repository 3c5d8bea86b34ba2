use crate::prelude::*;

///
/// Integration
///
/// One record per annotated declaration. Publishing metadata is defaulted
/// by the pipeline rather than authored.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub name: String,
    pub description: String,
    pub version: u32,
    pub deprecated: bool,
    pub deprecated_reason: String,
    pub documentation: String,
    pub image_icon: String,
    pub key_type: String,
    pub kind: Kind,
    pub platform_support: String,
    pub price: u32,
    pub public: bool,
}

impl Integration {
    /// Build an integration with the pipeline's publishing defaults.
    #[must_use]
    pub fn new(
        kind: Kind,
        key_type: impl Into<String>,
        platform_support: impl Into<String>,
    ) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: 1,
            deprecated: false,
            deprecated_reason: String::new(),
            documentation: String::new(),
            image_icon: String::new(),
            key_type: key_type.into(),
            kind,
            platform_support: platform_support.into(),
            price: 0,
            public: false,
        }
    }
}

///
/// TESTS
///
