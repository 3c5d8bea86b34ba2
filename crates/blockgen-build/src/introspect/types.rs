use blockgen_schema::{
    BLOCK_INDEX_TYPE,
    args::{DataArgs, EventArgs, IntegrationArgs, PropArgs, SlotArgs},
    types::{Kind, ValueType},
};
use quote::ToTokens;
use syn::{
    GenericArgument, PathArguments, ReturnType, Type, TypeParamBound, punctuated::Punctuated,
    token::Plus,
};

///
/// Declaration
///
/// One annotated block function or action struct, with everything the later
/// stages need and no `syn` types.
///

#[derive(Clone, Debug)]
pub struct Declaration {
    pub kind: Kind,
    pub ident: String,
    pub module: Vec<String>,
    pub args: IntegrationArgs,

    /// Function parameters (block) or holder fields (action), in order.
    pub params: Vec<Param>,

    /// `#[action_function]` methods found on the action type.
    pub handlers: Vec<Handler>,

    /// `#[action_parameter]` structs linked to the action.
    pub holders: Vec<ParamHolder>,
}

impl Declaration {
    /// `crate::`-rooted path segments of the declared item.
    #[must_use]
    pub fn item_path(&self) -> Vec<String> {
        self.module
            .iter()
            .cloned()
            .chain(std::iter::once(self.ident.clone()))
            .collect()
    }

    /// Name used for directories and adapter types. Each `_` segment gets
    /// its first character uppercased and keeps the rest as written, so
    /// `compiler_button` is `CompilerButton` and `AIChatBot` stays as is.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.ident.split('_').map(capitalize).collect()
    }

    /// The single parameter holder, when there is exactly one.
    #[must_use]
    pub fn holder(&self) -> Option<&ParamHolder> {
        match self.holders.as_slice() {
            [holder] => Some(holder),
            _ => None,
        }
    }

    /// The single handler, when there is exactly one.
    #[must_use]
    pub fn handler(&self) -> Option<&Handler> {
        match self.handlers.as_slice() {
            [handler] => Some(handler),
            _ => None,
        }
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

///
/// Param
///

#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub ty: TypeTag,

    /// The declared type as written.
    pub rust_type: String,

    pub annotations: Vec<FieldAnnotation>,

    /// Source text of a `#[default(..)]` expression.
    pub default_expr: Option<String>,
}

impl Param {
    /// The single field annotation, when there is exactly one.
    #[must_use]
    pub fn annotation(&self) -> Option<&FieldAnnotation> {
        match self.annotations.as_slice() {
            [annotation] => Some(annotation),
            _ => None,
        }
    }
}

///
/// FieldAnnotation
///

#[derive(Clone, Debug)]
pub enum FieldAnnotation {
    Prop(PropArgs),
    Data(DataArgs),
    Event(EventArgs),
    Slot(SlotArgs),
}

///
/// Handler
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Handler {
    pub ident: String,
    pub is_async: bool,

    /// Takes `&self`; otherwise it is called as an associated function.
    pub has_receiver: bool,
}

///
/// ParamHolder
///

#[derive(Clone, Debug)]
pub struct ParamHolder {
    pub ident: String,
    pub module: Vec<String>,
    pub action: String,
    pub fields: Vec<Param>,
}

impl ParamHolder {
    #[must_use]
    pub fn item_path(&self) -> Vec<String> {
        self.module
            .iter()
            .cloned()
            .chain(std::iter::once(self.ident.clone()))
            .collect()
    }
}

///
/// TypeTag
///
/// What a parameter's declared type means to the pipeline.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeTag {
    Primitive(ValueType),
    Callable(Callable),
    Context(Context),
    Other(String),
}

impl TypeTag {
    /// Classify a declared type.
    #[must_use]
    pub fn of(ty: &Type) -> Self {
        match ty {
            Type::Group(group) => Self::of(&group.elem),
            Type::Paren(paren) => Self::of(&paren.elem),

            Type::Reference(reference) => match Self::of(&reference.elem) {
                Self::Context(context) => Self::Context(Context {
                    by_ref: true,
                    ..context
                }),
                _ => match callable(&reference.elem, CallableShape::Borrowed) {
                    Some(callable) => Self::Callable(callable),
                    None => Self::other(ty),
                },
            },

            Type::ImplTrait(imp) => fn_bound(&imp.bounds, CallableShape::Generic)
                .map_or_else(|| Self::other(ty), Self::Callable),

            Type::Path(type_path) if type_path.qself.is_none() => {
                let Some(last) = type_path.path.segments.last() else {
                    return Self::other(ty);
                };
                let name = last.ident.to_string();

                if name == "Option"
                    && let Some(inner) = single_type_arg(&last.arguments)
                {
                    return match Self::of(inner) {
                        Self::Callable(callable) => Self::Callable(Callable {
                            nullable: true,
                            ..callable
                        }),
                        Self::Context(context) => Self::Context(Context {
                            nullable: true,
                            ..context
                        }),
                        _ => Self::other(ty),
                    };
                }

                if matches!(name.as_str(), "Box" | "Arc" | "Rc")
                    && let Some(inner) = single_type_arg(&last.arguments)
                    && let Some(callable) = callable(inner, CallableShape::Pointer(name.clone()))
                {
                    return Self::Callable(callable);
                }

                if last.arguments.is_empty() {
                    if let Some(value_type) = ValueType::from_rust_type(&name) {
                        return Self::Primitive(value_type);
                    }
                    for kind in [Kind::Block, Kind::Action] {
                        if name.ends_with(kind.context_type()) {
                            return Self::Context(Context {
                                kind,
                                by_ref: false,
                                nullable: false,
                            });
                        }
                    }
                }

                Self::other(ty)
            }

            _ => Self::other(ty),
        }
    }

    fn other(ty: &Type) -> Self {
        Self::Other(render(ty))
    }

    #[must_use]
    pub const fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_context_for(&self, kind: Kind) -> bool {
        matches!(self, Self::Context(context) if context.kind == kind)
    }
}

///
/// Callable
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Callable {
    pub shape: CallableShape,

    /// Rendered argument types, in order.
    pub inputs: Vec<String>,
    pub output: Option<String>,
    pub nullable: bool,
}

impl Callable {
    /// A slot callback takes exactly one `BlockIndex`.
    #[must_use]
    pub fn is_index_callback(&self) -> bool {
        matches!(self.inputs.as_slice(), [input] if last_segment(input) == BLOCK_INDEX_TYPE)
    }
}

///
/// CallableShape
///
/// How the callable is passed: behind a smart pointer, as a generic
/// `impl Fn`, or as a `&dyn Fn` borrow.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CallableShape {
    Pointer(String),
    Generic,
    Borrowed,
}

///
/// Context
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Context {
    pub kind: Kind,
    pub by_ref: bool,
    pub nullable: bool,
}

/// Render a type or expression the way it would be quoted.
pub fn render(tokens: &impl ToTokens) -> String {
    tokens.to_token_stream().to_string()
}

/// Last `::` segment of a rendered type.
#[must_use]
pub fn last_segment(rendered: &str) -> &str {
    rendered.rsplit("::").next().unwrap_or(rendered).trim()
}

fn single_type_arg(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };

    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });

    match (types.next(), types.next()) {
        (Some(ty), None) => Some(ty),
        _ => None,
    }
}

fn callable(ty: &Type, shape: CallableShape) -> Option<Callable> {
    match ty {
        Type::TraitObject(object) => fn_bound(&object.bounds, shape),
        Type::Paren(paren) => callable(&paren.elem, shape),
        Type::Group(group) => callable(&group.elem, shape),
        _ => None,
    }
}

fn fn_bound(bounds: &Punctuated<TypeParamBound, Plus>, shape: CallableShape) -> Option<Callable> {
    bounds.iter().find_map(|bound| {
        let TypeParamBound::Trait(bound) = bound else {
            return None;
        };
        let last = bound.path.segments.last()?;
        if !matches!(last.ident.to_string().as_str(), "Fn" | "FnMut" | "FnOnce") {
            return None;
        }
        let PathArguments::Parenthesized(args) = &last.arguments else {
            return None;
        };

        let output = match &args.output {
            ReturnType::Default => None,
            ReturnType::Type(_, ty) => Some(render(ty)),
        };

        Some(Callable {
            shape: shape.clone(),
            inputs: args.inputs.iter().map(render).collect(),
            output,
            nullable: false,
        })
    })
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();

    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn tag(ty: Type) -> TypeTag {
        TypeTag::of(&ty)
    }

    #[test]
    fn primitives_map_by_name() {
        assert_eq!(tag(parse_quote!(String)), TypeTag::Primitive(ValueType::String));
        assert_eq!(
            tag(parse_quote!(::std::string::String)),
            TypeTag::Primitive(ValueType::String)
        );
        assert_eq!(tag(parse_quote!(f32)), TypeTag::Primitive(ValueType::Float));
        assert!(matches!(tag(parse_quote!(u8)), TypeTag::Other(_)));
        assert!(matches!(tag(parse_quote!(Option<i32>)), TypeTag::Other(_)));
    }

    #[test]
    fn callables_record_shape_and_inputs() {
        let TypeTag::Callable(boxed) = tag(parse_quote!(Box<dyn Fn(String, i32) + Send>)) else {
            panic!("expected callable");
        };
        assert_eq!(boxed.shape, CallableShape::Pointer("Box".to_string()));
        assert_eq!(boxed.inputs, ["String", "i32"]);
        assert!(!boxed.nullable);

        let TypeTag::Callable(generic) = tag(parse_quote!(impl Fn() -> bool)) else {
            panic!("expected callable");
        };
        assert_eq!(generic.shape, CallableShape::Generic);
        assert_eq!(generic.output.as_deref(), Some("bool"));

        let TypeTag::Callable(borrowed) = tag(parse_quote!(&dyn Fn(BlockIndex))) else {
            panic!("expected callable");
        };
        assert_eq!(borrowed.shape, CallableShape::Borrowed);
        assert!(borrowed.is_index_callback());
    }

    #[test]
    fn option_marks_callables_nullable() {
        let TypeTag::Callable(callable) =
            tag(parse_quote!(Option<Arc<dyn Fn(crate::BlockIndex) + Send + Sync>>))
        else {
            panic!("expected callable");
        };

        assert!(callable.nullable);
        assert!(callable.is_index_callback());
    }

    #[test]
    fn contexts_are_recognized_by_suffix() {
        assert_eq!(
            tag(parse_quote!(&BlockProps)),
            TypeTag::Context(Context {
                kind: Kind::Block,
                by_ref: true,
                nullable: false,
            })
        );
        assert_eq!(
            tag(parse_quote!(Option<nativeblocks_core::action::ActionProps>)),
            TypeTag::Context(Context {
                kind: Kind::Action,
                by_ref: false,
                nullable: true,
            })
        );
        assert!(tag(parse_quote!(ActionProps)).is_context_for(Kind::Action));
        assert!(!tag(parse_quote!(ActionProps)).is_context_for(Kind::Block));
    }

    #[test]
    fn non_callable_boxes_are_other() {
        assert_eq!(
            tag(parse_quote!(Box<str>)),
            TypeTag::Other("Box < str >".to_string())
        );
    }
}
