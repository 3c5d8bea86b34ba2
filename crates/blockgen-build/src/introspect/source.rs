use super::{
    SymbolSource,
    types::{Declaration, FieldAnnotation, Handler, Param, ParamHolder, TypeTag, render},
};
use crate::Error;
use blockgen_schema::{
    args::{ActionParameterArgs, DataArgs, EventArgs, IntegrationArgs, PropArgs, SlotArgs},
    types::Kind,
};
use darling::FromMeta;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use syn::{
    Attribute, Expr, Fields, FnArg, ImplItem, Item, ItemFn, ItemImpl, ItemStruct, Meta, Pat, Type,
};
use walkdir::WalkDir;

///
/// SourceFile
///

#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module: Vec<String>,
    pub text: String,
}

///
/// SourceTree
///
/// Rust source files read with `syn`. Files are visited in path order and
/// inline modules are entered, so discovery order is stable across runs.
///

#[derive(Clone, Debug, Default)]
pub struct SourceTree {
    files: Vec<SourceFile>,
}

impl SourceTree {
    /// Read every `.rs` file under `root`.
    pub fn scan(root: &Path) -> Result<Self, Error> {
        let mut tree = Self::default();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                Error::invalid_source(path, err)
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }

            let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
            let relative = path.strip_prefix(root).unwrap_or(path);
            tree.push(path, module_path(relative), text);
        }

        tracing::debug!("scanned {} source files under {}", tree.files.len(), root.display());

        Ok(tree)
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, module: Vec<String>, text: impl Into<String>) {
        self.files.push(SourceFile {
            path: path.into(),
            module,
            text: text.into(),
        });
    }

    /// A single crate-root file.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut tree = Self::default();
        tree.push("lib.rs", Vec::new(), text);

        tree
    }
}

impl SymbolSource for SourceTree {
    fn declarations(&self) -> Result<Vec<Declaration>, Error> {
        let mut visitor = Visitor::default();

        for file in &self.files {
            let parsed = syn::parse_file(&file.text)
                .map_err(|err| Error::invalid_source(&file.path, err))?;

            visitor.path.clone_from(&file.path);
            visitor.items(&parsed.items, &file.module)?;
        }

        Ok(visitor.finish())
    }
}

/// Module path of a file relative to the source root.
fn module_path(relative: &Path) -> Vec<String> {
    let mut segments: Vec<String> = relative
        .iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect();

    if let Some(file) = segments.pop() {
        let stem = file.strip_suffix(".rs").unwrap_or(&file);
        if !matches!(stem, "lib" | "main" | "mod") {
            segments.push(stem.to_string());
        }
    }

    segments
}

///
/// Visitor
///

#[derive(Default)]
struct Visitor {
    path: PathBuf,
    declarations: Vec<Declaration>,
    handlers: BTreeMap<String, Vec<Handler>>,
    holders: BTreeMap<String, Vec<ParamHolder>>,
}

impl Visitor {
    fn items(&mut self, items: &[Item], module: &[String]) -> Result<(), Error> {
        for item in items {
            match item {
                Item::Fn(item) => self.block(item, module)?,
                Item::Struct(item) => self.structure(item, module)?,
                Item::Impl(item) => self.action_functions(item),
                Item::Mod(item) => {
                    if let Some((_, content)) = &item.content {
                        let mut inner = module.to_vec();
                        inner.push(item.ident.to_string());
                        self.items(content, &inner)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn block(&mut self, item: &ItemFn, module: &[String]) -> Result<(), Error> {
        let Some(attr) = find_marker(&item.attrs, "block") else {
            return Ok(());
        };
        let args: IntegrationArgs = self.parse(attr)?;

        let mut params = Vec::new();
        for input in &item.sig.inputs {
            let FnArg::Typed(typed) = input else {
                continue;
            };
            let name = match typed.pat.as_ref() {
                Pat::Ident(pat) => pat.ident.to_string(),
                other => render(other),
            };
            params.push(self.param(name, &typed.ty, &typed.attrs, Kind::Block)?);
        }

        self.declarations.push(Declaration {
            kind: Kind::Block,
            ident: item.sig.ident.to_string(),
            module: module.to_vec(),
            args,
            params,
            handlers: Vec::new(),
            holders: Vec::new(),
        });

        Ok(())
    }

    fn structure(&mut self, item: &ItemStruct, module: &[String]) -> Result<(), Error> {
        if let Some(attr) = find_marker(&item.attrs, "action") {
            let args: IntegrationArgs = self.parse(attr)?;

            self.declarations.push(Declaration {
                kind: Kind::Action,
                ident: item.ident.to_string(),
                module: module.to_vec(),
                args,
                params: Vec::new(),
                handlers: Vec::new(),
                holders: Vec::new(),
            });
        }

        if let Some(attr) = find_marker(&item.attrs, "action_parameter") {
            let args: ActionParameterArgs = self.parse(attr)?;

            let mut fields = Vec::new();
            if let Fields::Named(named) = &item.fields {
                for field in &named.named {
                    let name = field.ident.as_ref().map(ToString::to_string).unwrap_or_default();
                    fields.push(self.param(name, &field.ty, &field.attrs, Kind::Action)?);
                }
            }

            self.holders
                .entry(args.action.clone())
                .or_default()
                .push(ParamHolder {
                    ident: item.ident.to_string(),
                    module: module.to_vec(),
                    action: args.action,
                    fields,
                });
        }

        Ok(())
    }

    fn action_functions(&mut self, item: &ItemImpl) {
        if item.trait_.is_some() {
            return;
        }
        let Type::Path(self_ty) = item.self_ty.as_ref() else {
            return;
        };
        let Some(owner) = self_ty.path.segments.last() else {
            return;
        };

        for impl_item in &item.items {
            let ImplItem::Fn(method) = impl_item else {
                continue;
            };
            if find_marker(&method.attrs, "action_function").is_none() {
                continue;
            }

            self.handlers
                .entry(owner.ident.to_string())
                .or_default()
                .push(Handler {
                    ident: method.sig.ident.to_string(),
                    is_async: method.sig.asyncness.is_some(),
                    has_receiver: method.sig.receiver().is_some(),
                });
        }
    }

    fn param(
        &self,
        name: String,
        ty: &Type,
        attrs: &[Attribute],
        kind: Kind,
    ) -> Result<Param, Error> {
        let mut annotations = Vec::new();
        let mut default_expr = None;

        for attr in attrs {
            let Some(marker) = marker_name(attr) else {
                continue;
            };
            let annotation = match marker.as_str() {
                "prop" => FieldAnnotation::Prop(self.parse::<PropArgs>(attr)?),
                "data" => FieldAnnotation::Data(self.parse::<DataArgs>(attr)?),
                "event" => FieldAnnotation::Event(self.parse::<EventArgs>(attr)?),
                "slot" if kind == Kind::Block => {
                    FieldAnnotation::Slot(self.parse::<SlotArgs>(attr)?)
                }
                "default" => {
                    let expr: Expr = attr
                        .parse_args()
                        .map_err(|err| Error::invalid_source(&self.path, err))?;
                    default_expr = Some(render(&expr));
                    continue;
                }
                _ => continue,
            };
            annotations.push(annotation);
        }

        Ok(Param {
            name,
            ty: TypeTag::of(ty),
            rust_type: render(ty),
            annotations,
            default_expr,
        })
    }

    fn parse<T: FromMeta>(&self, attr: &Attribute) -> Result<T, Error> {
        let parsed = match &attr.meta {
            Meta::Path(_) => T::from_list(&[]),
            meta => T::from_meta(meta),
        };

        parsed.map_err(|err| {
            let marker = marker_name(attr).unwrap_or_default();
            Error::invalid_source(&self.path, format!("#[{marker}]: {err}"))
        })
    }

    // Handlers and holders may be declared in any file, so they are linked
    // once everything has been read.
    fn finish(mut self) -> Vec<Declaration> {
        for declaration in &mut self.declarations {
            if declaration.kind != Kind::Action {
                continue;
            }

            declaration.handlers = self.handlers.remove(&declaration.ident).unwrap_or_default();
            declaration.holders = self.holders.remove(&declaration.ident).unwrap_or_default();
            if let Some(holder) = declaration.holder() {
                declaration.params = holder.fields.clone();
            }
        }

        self.declarations
    }
}

const MARKERS: [&str; 9] = [
    "action",
    "action_function",
    "action_parameter",
    "block",
    "data",
    "default",
    "event",
    "prop",
    "slot",
];

/// Name of a blockgen marker attribute, matched on its last path segment.
fn marker_name(attr: &Attribute) -> Option<String> {
    let name = attr.path().segments.last()?.ident.to_string();

    MARKERS.contains(&name.as_str()).then_some(name)
}

fn find_marker<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs
        .iter()
        .find(|attr| marker_name(attr).as_deref() == Some(name))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::types::{CallableShape, TypeTag};
    use blockgen_schema::types::{Then, ValueType};

    fn declarations(text: &str) -> Vec<Declaration> {
        SourceTree::from_text(text).declarations().unwrap()
    }

    #[test]
    fn module_paths_follow_file_layout() {
        assert_eq!(module_path(Path::new("lib.rs")), Vec::<String>::new());
        assert_eq!(module_path(Path::new("ui/mod.rs")), ["ui"]);
        assert_eq!(module_path(Path::new("ui/button.rs")), ["ui", "button"]);
    }

    #[test]
    fn reads_block_parameters_in_order() {
        let found = declarations(
            r#"
            #[block(key_type = "BUTTON", name = "Button", description = "A button")]
            pub fn button(
                props: &BlockProps,
                #[data(description = "Label")] text: String,
                #[prop(value_picker = "dropdown")]
                #[default("S")]
                size: String,
                #[event(data_binding = "text")] on_click: Box<dyn Fn(String)>,
            ) {}
            "#,
        );

        let [block] = found.as_slice() else {
            panic!("expected one declaration");
        };
        assert_eq!(block.kind, Kind::Block);
        assert_eq!(block.args.key_type, "BUTTON");

        let names: Vec<_> = block.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["props", "text", "size", "on_click"]);
        assert!(block.params[0].annotations.is_empty());
        assert_eq!(block.params[1].ty, TypeTag::Primitive(ValueType::String));
        assert_eq!(block.params[2].default_expr.as_deref(), Some("\"S\""));
        assert!(matches!(
            &block.params[3].ty,
            TypeTag::Callable(c) if c.shape == CallableShape::Pointer("Box".to_string())
        ));
    }

    #[test]
    fn links_action_handlers_and_holders_across_modules() {
        let mut tree = SourceTree::default();
        tree.push(
            "bot.rs",
            vec!["bot".to_string()],
            r#"
            #[action(key_type = "XBOT", name = "X bot", description = "")]
            pub struct XBot;

            impl XBot {
                #[action_function]
                pub async fn ask(&self, parameters: XBotParameters) {}

                pub fn unrelated(&self) {}
            }
            "#,
        );
        tree.push(
            "params.rs",
            vec!["params".to_string()],
            r#"
            #[action_parameter(action = "XBot")]
            pub struct XBotParameters {
                pub action_props: ActionProps,
                #[prop] pub api_key: String,
                #[event(then = "SUCCESS")] pub on_message: Box<dyn Fn(String) + Send>,
            }
            "#,
        );

        let found = tree.declarations().unwrap();
        let [action] = found.as_slice() else {
            panic!("expected one declaration");
        };

        assert_eq!(action.module, ["bot"]);
        assert_eq!(
            action.handlers,
            [Handler {
                ident: "ask".to_string(),
                is_async: true,
                has_receiver: true,
            }]
        );
        let holder = action.holder().unwrap();
        assert_eq!(holder.item_path(), ["params", "XBotParameters"]);
        assert_eq!(action.params.len(), 3);
        assert!(matches!(
            &action.params[2].annotations[..],
            [FieldAnnotation::Event(args)] if args.then == Then::Success
        ));
    }

    #[test]
    fn inline_modules_extend_the_module_path() {
        let found = declarations(
            r#"
            mod widgets {
                #[block(key_type = "CARD", name = "Card", description = "")]
                pub fn card() {}
            }
            "#,
        );

        assert_eq!(found[0].item_path(), ["widgets", "card"]);
    }

    #[test]
    fn malformed_annotations_are_source_errors() {
        let result = SourceTree::from_text(
            r#"
            #[block(name = "Missing key")]
            pub fn broken() {}
            "#,
        )
        .declarations();

        assert!(matches!(result, Err(Error::Source { .. })));
    }

    #[test]
    fn unparseable_files_are_source_errors() {
        let result = SourceTree::from_text("fn {").declarations();

        assert!(matches!(result, Err(Error::Source { .. })));
    }

    #[test]
    fn slot_markers_on_holders_are_ignored() {
        let found = declarations(
            r#"
            #[action(key_type = "A", name = "A", description = "")]
            pub struct A;

            #[action_parameter(action = "A")]
            pub struct AParameters {
                #[slot] pub content: Box<dyn Fn(BlockIndex)>,
            }
            "#,
        );

        assert!(found[0].params[0].annotations.is_empty());
    }

    #[test]
    fn marker_paths_may_be_qualified() {
        let found = declarations(
            r#"
            #[blockgen::block(key_type = "Q", name = "Q", description = "")]
            pub fn q(#[blockgen::prop] size: i32) {}
            "#,
        );

        assert!(matches!(
            &found[0].params[0].annotations[..],
            [FieldAnnotation::Prop(_)]
        ));
    }
}
