use crate::types::ValueType;
use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, quote};

///
/// PrimitiveValue
///
/// A default value decoded under its declared primitive type. Schema
/// artifacts carry the string encoding; generated adapters embed the decoded
/// literal so nothing is re-parsed per invocation.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveValue {
    String(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
}

impl PrimitiveValue {
    /// The value used when nothing else is declared.
    #[must_use]
    pub const fn zero(ty: ValueType) -> Self {
        match ty {
            ValueType::String => Self::String(String::new()),
            ValueType::Int => Self::Int(0),
            ValueType::Long => Self::Long(0),
            ValueType::Float => Self::Float(0.0),
            ValueType::Double => Self::Double(0.0),
            ValueType::Boolean => Self::Boolean(false),
        }
    }

    /// Decode a string-encoded value. An empty non-string value decodes to
    /// the type's zero value; anything unparseable yields `None`.
    #[must_use]
    pub fn decode(ty: ValueType, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if ty != ValueType::String && trimmed.is_empty() {
            return Some(Self::zero(ty));
        }
        let raw = if ty == ValueType::String { raw } else { trimmed };

        match ty {
            ValueType::String => Some(Self::String(raw.to_string())),
            ValueType::Int => raw.parse().ok().map(Self::Int),
            ValueType::Long => raw.parse().ok().map(Self::Long),
            ValueType::Float => raw
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Float),
            ValueType::Double => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Double),
            ValueType::Boolean => raw.to_ascii_lowercase().parse().ok().map(Self::Boolean),
        }
    }

    /// String encoding written into schema artifacts.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::String(v) => v.clone(),
            Self::Int(v) => v.to_string(),
            Self::Long(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Boolean(v) => v.to_string(),
        }
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Int(_) => ValueType::Int,
            Self::Long(_) => ValueType::Long,
            Self::Float(_) => ValueType::Float,
            Self::Double(_) => ValueType::Double,
            Self::Boolean(_) => ValueType::Boolean,
        }
    }
}

// Literals are emitted unsuffixed; the generated `let` binding fixes the type.
fn signed(negative: bool, magnitude: Literal) -> TokenStream {
    if negative {
        quote!(-#magnitude)
    } else {
        quote!(#magnitude)
    }
}

impl ToTokens for PrimitiveValue {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let expr = match self {
            Self::String(v) => quote!(::std::string::String::from(#v)),
            Self::Int(v) => signed(*v < 0, Literal::u64_unsuffixed(u64::from(v.unsigned_abs()))),
            Self::Long(v) => signed(*v < 0, Literal::u64_unsuffixed(v.unsigned_abs())),
            Self::Float(v) => signed(v.is_sign_negative(), Literal::f32_unsuffixed(v.abs())),
            Self::Double(v) => signed(v.is_sign_negative(), Literal::f64_unsuffixed(v.abs())),
            Self::Boolean(v) => quote!(#v),
        };

        tokens.extend(expr);
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_non_string_decodes_to_zero() {
        assert_eq!(
            PrimitiveValue::decode(ValueType::Int, ""),
            Some(PrimitiveValue::Int(0))
        );
        assert_eq!(
            PrimitiveValue::decode(ValueType::Boolean, "  "),
            Some(PrimitiveValue::Boolean(false))
        );
        assert_eq!(
            PrimitiveValue::decode(ValueType::String, ""),
            Some(PrimitiveValue::String(String::new()))
        );
    }

    #[test]
    fn boolean_decoding_is_case_insensitive_but_strict() {
        assert_eq!(
            PrimitiveValue::decode(ValueType::Boolean, "TRUE"),
            Some(PrimitiveValue::Boolean(true))
        );
        assert_eq!(PrimitiveValue::decode(ValueType::Boolean, "yes"), None);
        assert_eq!(
            PrimitiveValue::decode(ValueType::Boolean, "true")
                .map(|v| v.encode())
                .as_deref(),
            Some("true")
        );
    }

    #[test]
    fn rejects_unparseable_and_non_finite_numbers() {
        assert_eq!(PrimitiveValue::decode(ValueType::Int, "abc"), None);
        assert_eq!(PrimitiveValue::decode(ValueType::Int, "3000000000"), None);
        assert_eq!(PrimitiveValue::decode(ValueType::Float, "NaN"), None);
        assert_eq!(PrimitiveValue::decode(ValueType::Double, "inf"), None);
    }

    #[test]
    fn literals_render_as_rust_expressions() {
        let tokens = |v: PrimitiveValue| v.to_token_stream().to_string();

        assert_eq!(tokens(PrimitiveValue::Int(12)), "12");
        assert_eq!(tokens(PrimitiveValue::Int(-3)), quote!(-3).to_string());
        assert_eq!(tokens(PrimitiveValue::Boolean(true)), "true");
        assert_eq!(tokens(PrimitiveValue::Double(2.0)), "2.0");
        assert_eq!(
            tokens(PrimitiveValue::String("S".to_string())),
            quote!(::std::string::String::from("S")).to_string()
        );
    }

    #[test]
    fn i32_min_renders_without_overflow() {
        let rendered = PrimitiveValue::Int(i32::MIN).to_token_stream().to_string();
        assert_eq!(rendered, quote!(-2147483648).to_string());
    }

    proptest! {
        #[test]
        fn int_round_trips(v in any::<i32>()) {
            let decoded = PrimitiveValue::decode(ValueType::Int, &v.to_string());
            prop_assert_eq!(decoded.map(|d| d.encode()), Some(v.to_string()));
        }

        #[test]
        fn long_round_trips(v in any::<i64>()) {
            let decoded = PrimitiveValue::decode(ValueType::Long, &v.to_string());
            prop_assert_eq!(decoded, Some(PrimitiveValue::Long(v)));
        }

        #[test]
        fn double_round_trips(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let encoded = PrimitiveValue::Double(v).encode();
            prop_assert_eq!(
                PrimitiveValue::decode(ValueType::Double, &encoded),
                Some(PrimitiveValue::Double(v))
            );
        }

        #[test]
        fn float_round_trips(v in proptest::num::f32::NORMAL) {
            let encoded = PrimitiveValue::Float(v).encode();
            prop_assert_eq!(
                PrimitiveValue::decode(ValueType::Float, &encoded),
                Some(PrimitiveValue::Float(v))
            );
        }

        #[test]
        fn boolean_round_trips(v in any::<bool>()) {
            let encoded = PrimitiveValue::Boolean(v).encode();
            prop_assert_eq!(
                PrimitiveValue::decode(ValueType::Boolean, &encoded),
                Some(PrimitiveValue::Boolean(v))
            );
        }

        #[test]
        fn string_round_trips(v in ".*") {
            let decoded = PrimitiveValue::decode(ValueType::String, &v).map(|d| d.encode());
            prop_assert_eq!(decoded, Some(v));
        }
    }
}
