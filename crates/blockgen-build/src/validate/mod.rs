//! Constraint validation.
//!
//! Rules run in a fixed order and the first failure is returned. The only
//! state carried between declarations is the keyType registry held by
//! [`ValidationContext`].

use crate::introspect::{Declaration, FieldAnnotation, Param, TypeTag};
use blockgen_schema::{
    diagnostic::Diagnostic,
    types::{Kind, Then},
};
use std::collections::{HashMap, HashSet};

///
/// ValidationContext
///
/// keyTypes accepted so far in this pass, upper-cased, mapped to the
/// declaration that claimed them.
///

#[derive(Clone, Debug, Default)]
pub struct ValidationContext {
    seen: HashMap<String, String>,
}

impl ValidationContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every rule against one declaration.
    pub fn validate(&mut self, declaration: &Declaration) -> Result<(), Diagnostic> {
        check_key_type_charset(declaration)?;
        self.claim_key_type(declaration)?;

        if declaration.kind == Kind::Action {
            check_action_shape(declaration)?;
        }

        for param in &declaration.params {
            check_single_annotation(declaration, param)?;
        }
        for param in &declaration.params {
            check_param_type(declaration, param)?;
        }

        if declaration.kind == Kind::Action {
            check_then(declaration)?;
        }

        Ok(())
    }

    fn claim_key_type(&mut self, declaration: &Declaration) -> Result<(), Diagnostic> {
        let key_type = &declaration.args.key_type;
        let normalized = key_type.to_ascii_uppercase();

        if let Some(previous) = self.seen.get(&normalized) {
            return Err(Diagnostic::KeyTypeCollision {
                declaration: declaration.ident.clone(),
                key_type: key_type.clone(),
                previous: previous.clone(),
            });
        }
        self.seen.insert(normalized, declaration.ident.clone());

        Ok(())
    }
}

/// keyTypes are `[A-Za-z_]+`.
#[must_use]
pub fn is_valid_key_type(key_type: &str) -> bool {
    !key_type.is_empty()
        && key_type
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '_')
}

fn check_key_type_charset(declaration: &Declaration) -> Result<(), Diagnostic> {
    let key_type = &declaration.args.key_type;

    if is_valid_key_type(key_type) {
        Ok(())
    } else {
        Err(Diagnostic::KeyTypeCharset {
            declaration: declaration.ident.clone(),
            key_type: key_type.clone(),
        })
    }
}

fn check_action_shape(declaration: &Declaration) -> Result<(), Diagnostic> {
    if declaration.handlers.len() != 1 {
        return Err(Diagnostic::MissingOrDuplicateHandler {
            declaration: declaration.ident.clone(),
            found: declaration.handlers.len(),
        });
    }
    if declaration.holders.len() != 1 {
        return Err(Diagnostic::MissingOrDuplicateParameterHolder {
            declaration: declaration.ident.clone(),
            found: declaration.holders.len(),
        });
    }

    Ok(())
}

fn check_single_annotation(declaration: &Declaration, param: &Param) -> Result<(), Diagnostic> {
    if param.annotations.len() > 1 {
        return Err(Diagnostic::ConflictingFieldAnnotation {
            declaration: declaration.ident.clone(),
            field: param.name.clone(),
        });
    }

    Ok(())
}

fn check_param_type(declaration: &Declaration, param: &Param) -> Result<(), Diagnostic> {
    let unsupported = || Diagnostic::UnsupportedCustomType {
        declaration: declaration.ident.clone(),
        field: param.name.clone(),
        found: param.rust_type.clone(),
    };

    let Some(annotation) = param.annotation() else {
        return if param.ty.is_context_for(declaration.kind) {
            Ok(())
        } else {
            Err(Diagnostic::UnannotatedParameter {
                declaration: declaration.ident.clone(),
                field: param.name.clone(),
            })
        };
    };

    match annotation {
        FieldAnnotation::Prop(args) => match param.ty {
            TypeTag::Primitive(_) => Ok(()),
            TypeTag::Other(_) if args.converter => Ok(()),
            _ => Err(unsupported()),
        },

        FieldAnnotation::Data(_) => match param.ty {
            TypeTag::Primitive(_) => Ok(()),
            _ => Err(unsupported()),
        },

        FieldAnnotation::Slot(_) => {
            let Some(callable) = param.ty.as_callable() else {
                return Err(Diagnostic::SlotNotCallable {
                    declaration: declaration.ident.clone(),
                    field: param.name.clone(),
                    found: param.rust_type.clone(),
                });
            };
            if !callable.is_index_callback() {
                return Err(Diagnostic::SlotMissingIndexType {
                    declaration: declaration.ident.clone(),
                    field: param.name.clone(),
                });
            }

            Ok(())
        }

        FieldAnnotation::Event(args) => {
            if param.ty.as_callable().is_none() {
                return Err(Diagnostic::EventNotCallable {
                    declaration: declaration.ident.clone(),
                    field: param.name.clone(),
                    found: param.rust_type.clone(),
                });
            }

            for key in args.data_binding.iter() {
                let bound = declaration
                    .param(key)
                    .is_some_and(|p| matches!(p.annotation(), Some(FieldAnnotation::Data(_))));

                if !bound {
                    return Err(Diagnostic::UnknownDataBinding {
                        declaration: declaration.ident.clone(),
                        field: param.name.clone(),
                        key: key.clone(),
                    });
                }
            }

            Ok(())
        }
    }
}

fn check_then(declaration: &Declaration) -> Result<(), Diagnostic> {
    let mut seen = HashSet::new();
    let mut outcome = false;
    let mut flow = false;

    for param in &declaration.params {
        let Some(FieldAnnotation::Event(args)) = param.annotation() else {
            continue;
        };
        let then = args.then;

        if !seen.insert(then) {
            return Err(Diagnostic::ThenNotUnique {
                declaration: declaration.ident.clone(),
                then: then.to_string(),
            });
        }
        outcome |= then.is_outcome();
        flow |= then.is_flow();
    }

    if outcome && flow {
        return Err(Diagnostic::ThenGroupConflict {
            declaration: declaration.ident.clone(),
        });
    }

    Ok(())
}

/// `then` values of an action's events, in field order.
#[must_use]
pub fn thens(declaration: &Declaration) -> Vec<Then> {
    declaration
        .params
        .iter()
        .filter_map(|param| match param.annotation() {
            Some(FieldAnnotation::Event(args)) => Some(args.then),
            _ => None,
        })
        .collect()
}

///
/// TESTS
///
