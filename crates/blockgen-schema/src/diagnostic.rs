use thiserror::Error as ThisError;

///
/// Diagnostic
///
/// The closed catalog of fatal validation and configuration errors. Every
/// variant names the declaration (and field, where there is one) at fault.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Diagnostic {
    #[error("required option '{option}' is missing")]
    ConfigurationMissing { option: String },

    #[error("{declaration}: field '{field}' carries more than one of prop, data, event, slot")]
    ConflictingFieldAnnotation { declaration: String, field: String },

    #[error("{declaration}: event '{field}' must be a callable, found '{found}'")]
    EventNotCallable {
        declaration: String,
        field: String,
        found: String,
    },

    #[error("{declaration}: default '{value}' for '{field}' is not a valid {ty}")]
    InvalidDefaultValue {
        declaration: String,
        field: String,
        ty: String,
        value: String,
    },

    #[error("{declaration}: keyType '{key_type}' may only contain letters and underscores")]
    KeyTypeCharset {
        declaration: String,
        key_type: String,
    },

    #[error("{declaration}: keyType '{key_type}' is already used by {previous}")]
    KeyTypeCollision {
        declaration: String,
        key_type: String,
        previous: String,
    },

    #[error("{declaration}: expected exactly one action function, found {found}")]
    MissingOrDuplicateHandler { declaration: String, found: usize },

    #[error("{declaration}: expected exactly one action parameter holder, found {found}")]
    MissingOrDuplicateParameterHolder { declaration: String, found: usize },

    #[error("{declaration}: slot '{field}' must take a single BlockIndex argument")]
    SlotMissingIndexType { declaration: String, field: String },

    #[error("{declaration}: slot '{field}' must be a callable, found '{found}'")]
    SlotNotCallable {
        declaration: String,
        field: String,
        found: String,
    },

    #[error("{declaration}: NEXT and END cannot be mixed with SUCCESS and FAILURE")]
    ThenGroupConflict { declaration: String },

    #[error("{declaration}: then '{then}' is used by more than one event")]
    ThenNotUnique { declaration: String, then: String },

    #[error("{declaration}: parameter '{field}' has no prop, data, event or slot marker")]
    UnannotatedParameter { declaration: String, field: String },

    #[error("{declaration}: event '{field}' binds unknown data key '{key}'")]
    UnknownDataBinding {
        declaration: String,
        field: String,
        key: String,
    },

    #[error("{declaration}: '{field}' uses unsupported value picker '{picker}'")]
    UnsupportedCustomPicker {
        declaration: String,
        field: String,
        picker: String,
    },

    #[error(
        "{declaration}: '{field}' has type '{found}'; only String, i32, i64, f32, f64 and bool are supported"
    )]
    UnsupportedCustomType {
        declaration: String,
        field: String,
        found: String,
    },
}

impl Diagnostic {
    /// Shorthand for a missing required option.
    #[must_use]
    pub fn missing(option: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            option: option.into(),
        }
    }
}

///
/// TESTS
///
