use crate::{
    Options,
    introspect::{Declaration, FieldAnnotation, Param, TypeTag},
};
use blockgen_schema::{
    args::{DataArgs, EventArgs, PropArgs, SlotArgs},
    prelude::*,
};
use syn::{Expr, ExprLit, ExprUnary, Lit, LitStr, UnOp};

///
/// Metadata
///
/// The schema records of one declaration. Built once, never mutated.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    pub integration: Integration,
    pub properties: Vec<Property>,
    pub data: Vec<Data>,
    pub events: Vec<Event>,
    pub slots: Vec<Slot>,
}

impl Metadata {
    /// Build the records for a validated declaration.
    pub fn build(declaration: &Declaration, options: &Options) -> Result<Self, Diagnostic> {
        let args = &declaration.args;
        let mut integration = Integration::new(
            declaration.kind,
            args.key_type.clone(),
            options.platform_support.clone(),
        );
        integration.name.clone_from(&args.name);
        integration.description.clone_from(&args.description);
        integration.version = args.version;
        integration.deprecated = args.deprecated;
        integration.deprecated_reason.clone_from(&args.deprecated_reason);

        let mut meta = Self {
            integration,
            properties: Vec::new(),
            data: Vec::new(),
            events: Vec::new(),
            slots: Vec::new(),
        };

        for param in &declaration.params {
            match param.annotation() {
                Some(FieldAnnotation::Prop(args)) => {
                    meta.properties.push(property(declaration, param, args)?);
                }
                Some(FieldAnnotation::Data(args)) => {
                    meta.data.push(data(declaration, param, args)?);
                }
                Some(FieldAnnotation::Event(args)) => {
                    meta.events.push(event(declaration.kind, param, args));
                }
                Some(FieldAnnotation::Slot(args)) => meta.slots.push(slot(param, args)),
                None => {}
            }
        }

        Ok(meta)
    }

    /// Directory name of the declaration's artifacts.
    #[must_use]
    pub fn dir_name(declaration: &Declaration) -> String {
        declaration.type_name()
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.key == key)
    }

    #[must_use]
    pub fn data(&self, key: &str) -> Option<&Data> {
        self.data.iter().find(|d| d.key == key)
    }

    #[must_use]
    pub fn event(&self, function_name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.function_name == function_name)
    }
}

fn property(
    declaration: &Declaration,
    param: &Param,
    args: &PropArgs,
) -> Result<Property, Diagnostic> {
    let value_picker = match args.value_picker.as_deref() {
        None => ValuePicker::default(),
        Some(raw) => raw.parse().map_err(|_| Diagnostic::UnsupportedCustomPicker {
            declaration: declaration.ident.clone(),
            field: param.name.clone(),
            picker: raw.to_string(),
        })?,
    };

    let (ty, converter) = match &param.ty {
        TypeTag::Primitive(ty) => (*ty, None),
        _ => (ValueType::String, Some(param.rust_type.clone())),
    };
    let value = default_text(args.default_value.as_deref(), param.default_expr.as_deref(), ty);
    let default = decode(declaration, param, ty, &value)?;

    Ok(Property {
        key: param.name.clone(),
        value,
        ty,
        description: args.description.clone(),
        deprecated: args.deprecated,
        deprecated_reason: args.deprecated_reason.clone(),
        value_picker,
        value_picker_group: args.value_picker_group.text.clone(),
        value_picker_options: args.value_picker_options.to_vec(),
        default: Some(default),
        converter,
    })
}

fn data(declaration: &Declaration, param: &Param, args: &DataArgs) -> Result<Data, Diagnostic> {
    let TypeTag::Primitive(ty) = param.ty else {
        return Err(Diagnostic::UnsupportedCustomType {
            declaration: declaration.ident.clone(),
            field: param.name.clone(),
            found: param.rust_type.clone(),
        });
    };
    let value = default_text(args.default_value.as_deref(), param.default_expr.as_deref(), ty);
    let default = decode(declaration, param, ty, &value)?;

    Ok(Data {
        key: param.name.clone(),
        ty,
        description: args.description.clone(),
        deprecated: args.deprecated,
        deprecated_reason: args.deprecated_reason.clone(),
        value,
        default: Some(default),
    })
}

fn event(kind: Kind, param: &Param, args: &EventArgs) -> Event {
    // Block events always continue the trigger chain.
    let (event, then) = match kind {
        Kind::Block => (param.name.clone(), Then::Next),
        Kind::Action => (args.then.to_string(), args.then),
    };

    Event {
        event,
        description: args.description.clone(),
        deprecated: args.deprecated,
        deprecated_reason: args.deprecated_reason.clone(),
        function_name: param.name.clone(),
        data_binding: args.data_binding.to_vec(),
        then,
    }
}

fn slot(param: &Param, args: &SlotArgs) -> Slot {
    Slot {
        slot: param.name.clone(),
        description: args.description.clone(),
        deprecated: args.deprecated,
        deprecated_reason: args.deprecated_reason.clone(),
    }
}

fn decode(
    declaration: &Declaration,
    param: &Param,
    ty: ValueType,
    value: &str,
) -> Result<PrimitiveValue, Diagnostic> {
    PrimitiveValue::decode(ty, value).ok_or_else(|| Diagnostic::InvalidDefaultValue {
        declaration: declaration.ident.clone(),
        field: param.name.clone(),
        ty: ty.to_string(),
        value: value.to_string(),
    })
}

/// Pick the string-encoded default: an explicit `default_value` wins over
/// the field's own `#[default(..)]` expression.
#[must_use]
pub fn default_text(explicit: Option<&str>, expr: Option<&str>, ty: ValueType) -> String {
    if let Some(explicit) = explicit.filter(|v| !v.is_empty()) {
        return explicit.to_string();
    }

    expr.map(|expr| normalize_expr(expr, ty)).unwrap_or_default()
}

// Source text of a default expression to its string encoding. Literals are
// read through `syn`, so escapes are resolved and any integer base or float
// exponent is accepted; anything else is kept as written.
fn normalize_expr(expr: &str, ty: ValueType) -> String {
    let Ok(parsed) = syn::parse_str::<Expr>(expr) else {
        return expr.trim().to_string();
    };

    let normalized = match ty {
        ValueType::String => string_literal(&parsed).map(|lit| lit.value()),
        ValueType::Boolean => match &parsed {
            Expr::Lit(ExprLit { lit: Lit::Bool(lit), .. }) => Some(lit.value.to_string()),
            _ => None,
        },
        _ => numeric_literal(&parsed),
    };

    normalized.unwrap_or_else(|| expr.trim().to_string())
}

// `"s"`, `String::from("s")`, `"s".to_string()` and friends.
fn string_literal(expr: &Expr) -> Option<&LitStr> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => Some(lit),
        Expr::Call(call) if call.args.len() == 1 => string_literal(&call.args[0]),
        Expr::MethodCall(call) if call.args.is_empty() => string_literal(&call.receiver),
        Expr::Paren(paren) => string_literal(&paren.expr),
        _ => None,
    }
}

fn numeric_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Int(lit), .. }) => {
            lit.base10_parse::<i128>().ok().map(|n| n.to_string())
        }
        Expr::Lit(ExprLit { lit: Lit::Float(lit), .. }) => {
            let digits = lit.base10_digits();
            if digits.contains(['e', 'E']) {
                lit.base10_parse::<f64>().ok().map(|n| n.to_string())
            } else {
                Some(digits.to_string())
            }
        }
        Expr::Unary(ExprUnary { op: UnOp::Neg(_), expr, .. }) => {
            numeric_literal(expr).map(|n| format!("-{n}"))
        }
        Expr::Paren(paren) => numeric_literal(&paren.expr),
        _ => None,
    }
}

///
/// TESTS
///
