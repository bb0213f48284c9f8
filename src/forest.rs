//! Declaration forest built from parsed source files.
//!
//! Every declaration the documentation run cares about (files, modules, types, `impl`
//! blocks, functions, fields and enum variants) becomes a node in an arena. Nodes carry
//! an explicit parent link and, except for `impl` blocks, their doc comment lines.
//! On top of the arena the forest indexes type declarations by fully-qualified name,
//! records the `use` imports of each module scope and groups handler functions into
//! controllers.
//!
//! Function bodies are not part of the forest: items declared inside a block are
//! never visited.

use crate::attrs::{
    find_all_merged, has_attr, meta_name, meta_str_value, nested_metas, parse_rename_all,
    parse_serde_attributes, SerdeAttributes,
};
use crate::comments::doc_lines;
use crate::parser::ParsedFile;
use crate::route::RequestMapping;
use crate::type_resolver::{extract_type_info, Imports, TypeInfo, TypeResolver};
use log::debug;
use quote::ToTokens;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{Attribute, Expr, Stmt};

/// Method adapters that still expose the field they are called on.
const ACCESSOR_ADAPTERS: &[&str] = &[
    "clone",
    "as_ref",
    "as_str",
    "as_deref",
    "as_slice",
    "to_owned",
    "to_string",
    "to_vec",
    "copied",
    "cloned",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Module,
    Type,
    Impl,
    Function,
    Field,
    Variant,
}

/// One declaration in the arena.
#[derive(Debug, Clone)]
pub struct DeclNode {
    pub kind: NodeKind,
    pub name: String,
    pub parent: Option<NodeId>,
    /// Index of the file the declaration lives in
    pub file: usize,
    pub doc_lines: Vec<String>,
}

impl DeclNode {
    /// Doc comment lines, or `None` when this kind of node cannot carry commentary.
    pub fn commentary(&self) -> Option<&[String]> {
        match self.kind {
            NodeKind::Impl => None,
            _ => Some(&self.doc_lines),
        }
    }
}

/// A module (file or inline `mod`) as a name-resolution scope.
#[derive(Debug, Clone)]
pub struct ModuleScope {
    /// `None` when the file location does not map onto a module path
    pub module_path: Option<String>,
    pub node: NodeId,
    pub imports: Imports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Struct,
    Enum,
    Trait,
    Union,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    /// Fully-qualified name such as `crate::dto::User`
    pub qualifier: Option<String>,
    pub kind: TypeKind,
    pub node: NodeId,
    /// Scope the type is declared in; its field types resolve from here
    pub scope: ScopeId,
    pub file: usize,
    pub fields: Vec<FieldDecl>,
    pub variants: Vec<VariantDecl>,
    pub methods: Vec<MethodDecl>,
    pub rename_all: Option<String>,
    /// Functions named by `#[validate(schema(function = ".."))]`
    pub cross_field_checks: Vec<String>,
    pub mapping: Option<RequestMapping>,
    pub deprecated: bool,
    pub attrs: Vec<Attribute>,
}

impl TypeDecl {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Members that take part in schema generation: named fields in declaration
    /// order, then cross-field check methods.
    pub fn members(&self) -> Vec<Member<'_>> {
        self.fields
            .iter()
            .map(Member::Field)
            .chain(
                self.methods
                    .iter()
                    .filter(|m| m.is_cross_field_check)
                    .map(Member::Method),
            )
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    /// The identifier followed by every serde alias
    pub bound_names: Vec<String>,
    pub node: NodeId,
    pub type_info: TypeInfo,
    pub attrs: Vec<Attribute>,
    pub serde: SerdeAttributes,
}

#[derive(Debug, Clone)]
pub struct VariantDecl {
    pub name: String,
    pub node: NodeId,
    pub serde: SerdeAttributes,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    /// `None` for cross-field checks that are free functions
    pub node: Option<NodeId>,
    /// Field returned by the method body (`self.x`, `&self.x`, `self.x.clone()`, ...)
    pub backing_field: Option<String>,
    pub attrs: Vec<Attribute>,
    pub is_cross_field_check: bool,
}

impl MethodDecl {
    fn cross_field_check(name: String) -> Self {
        Self {
            name,
            node: None,
            backing_field: None,
            attrs: Vec::new(),
            is_cross_field_check: true,
        }
    }
}

/// A field or method of a type, as seen by the schema engine.
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Field(&'a FieldDecl),
    Method(&'a MethodDecl),
}

impl<'a> Member<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Member::Field(field) => &field.name,
            Member::Method(method) => &method.name,
        }
    }

    pub fn attrs(&self) -> &'a [Attribute] {
        match self {
            Member::Field(field) => &field.attrs,
            Member::Method(method) => &method.attrs,
        }
    }
}

/// A function carrying a route attribute.
#[derive(Debug, Clone)]
pub struct HandlerDecl {
    pub name: String,
    pub node: NodeId,
    pub scope: ScopeId,
    pub file: usize,
    pub mapping: Option<RequestMapping>,
    pub signature: syn::Signature,
    pub deprecated: bool,
    pub source_code: String,
}

/// A module or type holding handler functions.
#[derive(Debug, Clone)]
pub struct ControllerDecl {
    pub name: String,
    pub node: NodeId,
    pub mapping: Option<RequestMapping>,
    pub deprecated: bool,
    pub handlers: Vec<HandlerDecl>,
}

#[derive(Debug, Clone)]
pub struct FileDecl {
    pub path: PathBuf,
    pub module_path: Option<String>,
    pub node: NodeId,
    pub scope: ScopeId,
    pub top_level_types: Vec<NodeId>,
}

/// Arena of declarations built from every parsed file of a project.
#[derive(Debug, Default)]
pub struct DeclarationForest {
    nodes: Vec<DeclNode>,
    scopes: Vec<ModuleScope>,
    types: Vec<TypeDecl>,
    type_index: HashMap<String, usize>,
    type_by_node: HashMap<NodeId, usize>,
    files: Vec<FileDecl>,
    controllers: Vec<ControllerDecl>,
}

impl DeclarationForest {
    /// Builds the forest from parsed files.
    ///
    /// Files are processed in the given order, which fixes the order of controllers
    /// and of the simple-name fallback during type resolution.
    pub fn build(files: &[ParsedFile]) -> Self {
        let mut builder = ForestBuilder::default();
        for file in files {
            builder.add_file(file);
        }
        let forest = builder.finish();
        debug!(
            "Built declaration forest: {} nodes, {} types, {} controllers",
            forest.nodes.len(),
            forest.types.len(),
            forest.controllers.len()
        );
        forest
    }

    pub fn node(&self, id: NodeId) -> &DeclNode {
        &self.nodes[id.0]
    }

    pub fn scope(&self, id: ScopeId) -> &ModuleScope {
        &self.scopes[id.0]
    }

    pub fn file(&self, index: usize) -> &FileDecl {
        &self.files[index]
    }

    #[cfg(test)]
    pub(crate) fn file_scope(&self, index: usize) -> ScopeId {
        self.files[index].scope
    }

    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    pub fn type_by_qualifier(&self, qualifier: &str) -> Option<&TypeDecl> {
        self.type_index.get(qualifier).map(|&i| &self.types[i])
    }

    /// Type declarations with the given simple name, in forest order.
    pub fn types_named(&self, name: &str) -> Vec<&TypeDecl> {
        self.types.iter().filter(|t| t.name == name).collect()
    }

    pub fn controllers(&self) -> &[ControllerDecl] {
        &self.controllers
    }
}

/// `impl` block waiting for its self type to be resolved.
struct PendingImpl {
    node: NodeId,
    scope: ScopeId,
    self_ty: TypeInfo,
    inherent: bool,
    mapping: Option<RequestMapping>,
    deprecated: bool,
    methods: Vec<MethodDecl>,
    handlers: Vec<HandlerDecl>,
}

/// Attributes of a `mod name;` declaration, applied to the file defining the module.
struct ModDeclaration {
    mapping: Option<RequestMapping>,
    deprecated: bool,
    doc_lines: Vec<String>,
}

#[derive(Default)]
struct ForestBuilder<'a> {
    forest: DeclarationForest,
    content: &'a str,
    file_index: usize,
    /// Enclosing file or module nodes with their scopes, innermost last
    containers: Vec<(NodeId, ScopeId)>,
    container_routes: HashMap<NodeId, (Option<RequestMapping>, bool)>,
    module_controllers: HashMap<NodeId, usize>,
    pending_impls: Vec<PendingImpl>,
    mod_declarations: HashMap<String, ModDeclaration>,
}

impl<'a> ForestBuilder<'a> {
    fn add_file(&mut self, file: &'a ParsedFile) {
        debug!("Adding {} to the declaration forest", file.path.display());

        self.file_index = self.forest.files.len();
        self.content = &file.content;

        let name = file
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let attrs = &file.syntax_tree.attrs;
        let node = self.add_node(NodeKind::File, name, None, doc_lines(attrs));
        let scope = self.add_scope(file.module_path.clone(), node);
        self.container_routes.insert(
            node,
            (RequestMapping::from_attrs(attrs), has_attr(attrs, "deprecated")),
        );
        self.forest.files.push(FileDecl {
            path: file.path.clone(),
            module_path: file.module_path.clone(),
            node,
            scope,
            top_level_types: Vec::new(),
        });

        self.containers.push((node, scope));
        self.visit_file(&file.syntax_tree);
        self.containers.pop();
    }

    fn add_node(
        &mut self,
        kind: NodeKind,
        name: String,
        parent: Option<NodeId>,
        doc_lines: Vec<String>,
    ) -> NodeId {
        let id = NodeId(self.forest.nodes.len());
        self.forest.nodes.push(DeclNode {
            kind,
            name,
            parent,
            file: self.file_index,
            doc_lines,
        });
        id
    }

    fn add_scope(&mut self, module_path: Option<String>, node: NodeId) -> ScopeId {
        let id = ScopeId(self.forest.scopes.len());
        self.forest.scopes.push(ModuleScope {
            module_path,
            node,
            imports: Imports::default(),
        });
        id
    }

    fn current(&self) -> (NodeId, ScopeId) {
        // add_file always pushes the file container before visiting
        self.containers[self.containers.len() - 1]
    }

    /// Registers a type declaration and returns its index.
    fn add_type(&mut self, kind: TypeKind, ident: &syn::Ident, attrs: &[Attribute]) -> usize {
        let (container, scope) = self.current();
        let name = ident.unraw().to_string();
        let node = self.add_node(NodeKind::Type, name.clone(), Some(container), doc_lines(attrs));
        let qualifier = self.forest.scopes[scope.0]
            .module_path
            .as_ref()
            .map(|module| format!("{}::{}", module, name));

        let index = self.forest.types.len();
        if let Some(qualifier) = &qualifier {
            if self.forest.type_index.contains_key(qualifier) {
                debug!("Duplicate declaration of {}, keeping the first", qualifier);
            } else {
                self.forest.type_index.insert(qualifier.clone(), index);
            }
        }
        self.forest.type_by_node.insert(node, index);
        if self.containers.len() == 1 {
            self.forest.files[self.file_index].top_level_types.push(node);
        }

        self.forest.types.push(TypeDecl {
            name,
            qualifier,
            kind,
            node,
            scope,
            file: self.file_index,
            fields: Vec::new(),
            variants: Vec::new(),
            methods: Vec::new(),
            rename_all: parse_rename_all(attrs),
            cross_field_checks: cross_field_checks(attrs),
            mapping: RequestMapping::from_attrs(attrs),
            deprecated: has_attr(attrs, "deprecated"),
            attrs: attrs.to_vec(),
        });
        index
    }

    fn add_fields(&mut self, type_index: usize, fields: &syn::FieldsNamed) {
        let type_node = self.forest.types[type_index].node;
        for field in &fields.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let name = ident.unraw().to_string();
            let serde = parse_serde_attributes(&field.attrs);

            let mut bound_names = vec![name.clone()];
            for alias in &serde.aliases {
                if !bound_names.contains(alias) {
                    bound_names.push(alias.clone());
                }
            }

            let node = self.add_node(
                NodeKind::Field,
                name.clone(),
                Some(type_node),
                doc_lines(&field.attrs),
            );
            self.forest.types[type_index].fields.push(FieldDecl {
                name,
                bound_names,
                node,
                type_info: extract_type_info(&field.ty),
                attrs: field.attrs.clone(),
                serde,
            });
        }
    }

    fn handler(
        &mut self,
        node: NodeId,
        mapping: RequestMapping,
        sig: &syn::Signature,
        attrs: &[Attribute],
        item: &dyn ToTokens,
    ) -> HandlerDecl {
        let (_, scope) = self.current();
        HandlerDecl {
            name: sig.ident.unraw().to_string(),
            node,
            scope,
            file: self.file_index,
            mapping: Some(mapping),
            signature: sig.clone(),
            deprecated: has_attr(attrs, "deprecated"),
            source_code: snippet(self.content, item),
        }
    }

    /// Controller for the module `container`, created on its first handler.
    fn module_controller(&mut self, container: NodeId) -> usize {
        if let Some(&index) = self.module_controllers.get(&container) {
            return index;
        }
        let (mapping, deprecated) = self
            .container_routes
            .get(&container)
            .cloned()
            .unwrap_or_default();
        let index = self.forest.controllers.len();
        self.forest.controllers.push(ControllerDecl {
            name: self.forest.nodes[container.0].name.clone(),
            node: container,
            mapping,
            deprecated,
            handlers: Vec::new(),
        });
        self.module_controllers.insert(container, index);
        index
    }

    fn finish(mut self) -> DeclarationForest {
        let targets: Vec<Option<NodeId>> = {
            let resolver = TypeResolver::new(&self.forest);
            self.pending_impls
                .iter()
                .map(|pending| {
                    resolver
                        .resolve(&pending.self_ty, pending.scope)
                        .map(|decl| decl.node)
                })
                .collect()
        };

        self.apply_mod_declarations();

        let mut type_controllers: HashMap<NodeId, usize> = HashMap::new();
        let pending_impls = std::mem::take(&mut self.pending_impls);
        for (pending, target) in pending_impls.into_iter().zip(targets) {
            let type_index = target.and_then(|node| self.forest.type_by_node.get(&node).copied());

            match type_index {
                Some(index) => {
                    let type_decl = &mut self.forest.types[index];
                    self.forest.nodes[pending.node.0].parent = Some(type_decl.node);
                    if pending.inherent {
                        type_decl.methods.extend(pending.methods);
                    }
                }
                None => debug!(
                    "Self type {} of impl block is not declared in the project",
                    pending.self_ty.name
                ),
            }

            if pending.handlers.is_empty() {
                continue;
            }

            let (node, name, mapping, deprecated) = match type_index {
                Some(index) => {
                    let type_decl = &self.forest.types[index];
                    (
                        type_decl.node,
                        type_decl.name.clone(),
                        type_decl.mapping.clone().or(pending.mapping),
                        type_decl.deprecated || pending.deprecated,
                    )
                }
                None => (
                    pending.node,
                    pending.self_ty.name.clone(),
                    pending.mapping,
                    pending.deprecated,
                ),
            };

            match type_controllers.get(&node) {
                Some(&index) => self.forest.controllers[index]
                    .handlers
                    .extend(pending.handlers),
                None => {
                    type_controllers.insert(node, self.forest.controllers.len());
                    self.forest.controllers.push(ControllerDecl {
                        name,
                        node,
                        mapping,
                        deprecated,
                        handlers: pending.handlers,
                    });
                }
            }
        }

        for type_decl in &mut self.forest.types {
            let field_names: HashSet<&str> =
                type_decl.fields.iter().map(|f| f.name.as_str()).collect();
            for method in &mut type_decl.methods {
                let backed = method
                    .backing_field
                    .as_deref()
                    .is_some_and(|field| field_names.contains(field));
                if !backed {
                    method.backing_field = None;
                }
            }

            for check in &type_decl.cross_field_checks {
                match type_decl.methods.iter_mut().find(|m| &m.name == check) {
                    Some(method) => method.is_cross_field_check = true,
                    None => type_decl
                        .methods
                        .push(MethodDecl::cross_field_check(check.clone())),
                }
            }
        }

        // Controllers in source order of their first handler
        self.forest
            .controllers
            .sort_by_key(|c| c.handlers.first().map(|h| h.node));

        self.forest
    }

    /// Applies `mod name;` attributes to the files that define those modules.
    fn apply_mod_declarations(&mut self) {
        for file in &self.forest.files {
            let Some(declaration) = file
                .module_path
                .as_ref()
                .and_then(|path| self.mod_declarations.get(path))
            else {
                continue;
            };

            let node = &mut self.forest.nodes[file.node.0];
            if node.doc_lines.is_empty() {
                node.doc_lines = declaration.doc_lines.clone();
            }

            if let Some(&index) = self.module_controllers.get(&file.node) {
                let controller = &mut self.forest.controllers[index];
                if controller.mapping.is_none() {
                    controller.mapping = declaration.mapping.clone();
                }
                controller.deprecated |= declaration.deprecated;
            }
        }
    }
}

impl<'ast, 'a> Visit<'ast> for ForestBuilder<'a> {
    fn visit_block(&mut self, _node: &'ast syn::Block) {}

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        let (_, scope) = self.current();
        self.forest.scopes[scope.0]
            .imports
            .collect(&node.tree, &mut Vec::new());
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        let (container, parent_scope) = self.current();
        let name = node.ident.unraw().to_string();
        let module_path = self.forest.scopes[parent_scope.0]
            .module_path
            .as_ref()
            .map(|parent| format!("{}::{}", parent, name));

        let Some((_, items)) = &node.content else {
            if let Some(module_path) = module_path {
                self.mod_declarations.insert(
                    module_path,
                    ModDeclaration {
                        mapping: RequestMapping::from_attrs(&node.attrs),
                        deprecated: has_attr(&node.attrs, "deprecated"),
                        doc_lines: doc_lines(&node.attrs),
                    },
                );
            }
            return;
        };

        let id = self.add_node(NodeKind::Module, name, Some(container), doc_lines(&node.attrs));
        let scope = self.add_scope(module_path, id);
        self.container_routes.insert(
            id,
            (
                RequestMapping::from_attrs(&node.attrs),
                has_attr(&node.attrs, "deprecated"),
            ),
        );

        self.containers.push((id, scope));
        for item in items {
            self.visit_item(item);
        }
        self.containers.pop();
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        let index = self.add_type(TypeKind::Struct, &node.ident, &node.attrs);
        if let syn::Fields::Named(fields) = &node.fields {
            self.add_fields(index, fields);
        }
    }

    fn visit_item_union(&mut self, node: &'ast syn::ItemUnion) {
        let index = self.add_type(TypeKind::Union, &node.ident, &node.attrs);
        self.add_fields(index, &node.fields);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        let index = self.add_type(TypeKind::Enum, &node.ident, &node.attrs);
        let type_node = self.forest.types[index].node;
        for variant in &node.variants {
            let name = variant.ident.unraw().to_string();
            let node = self.add_node(
                NodeKind::Variant,
                name.clone(),
                Some(type_node),
                doc_lines(&variant.attrs),
            );
            self.forest.types[index].variants.push(VariantDecl {
                name,
                node,
                serde: parse_serde_attributes(&variant.attrs),
            });
        }
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        let index = self.add_type(TypeKind::Trait, &node.ident, &node.attrs);
        let type_node = self.forest.types[index].node;
        for item in &node.items {
            if let syn::TraitItem::Fn(method) = item {
                let name = method.sig.ident.unraw().to_string();
                let node = self.add_node(
                    NodeKind::Function,
                    name.clone(),
                    Some(type_node),
                    doc_lines(&method.attrs),
                );
                let backing_field = method
                    .default
                    .as_ref()
                    .and_then(|block| backing_field_of(&method.sig, block));
                self.forest.types[index].methods.push(MethodDecl {
                    name,
                    node: Some(node),
                    backing_field,
                    attrs: method.attrs.clone(),
                    is_cross_field_check: false,
                });
            }
        }
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let (container, scope) = self.current();
        let self_ty = extract_type_info(&node.self_ty);
        let impl_node = self.add_node(
            NodeKind::Impl,
            format!("impl {}", self_ty.name),
            Some(container),
            Vec::new(),
        );

        let mut methods = Vec::new();
        let mut handlers = Vec::new();
        for item in &node.items {
            let syn::ImplItem::Fn(method) = item else {
                continue;
            };
            let name = method.sig.ident.unraw().to_string();
            let fn_node = self.add_node(
                NodeKind::Function,
                name.clone(),
                Some(impl_node),
                doc_lines(&method.attrs),
            );
            if let Some(mapping) = RequestMapping::from_attrs(&method.attrs) {
                handlers.push(self.handler(fn_node, mapping, &method.sig, &method.attrs, method));
            }
            methods.push(MethodDecl {
                name,
                node: Some(fn_node),
                backing_field: backing_field_of(&method.sig, &method.block),
                attrs: method.attrs.clone(),
                is_cross_field_check: false,
            });
        }

        self.pending_impls.push(PendingImpl {
            node: impl_node,
            scope,
            self_ty,
            inherent: node.trait_.is_none(),
            mapping: RequestMapping::from_attrs(&node.attrs),
            deprecated: has_attr(&node.attrs, "deprecated"),
            methods,
            handlers,
        });
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        let Some(mapping) = RequestMapping::from_attrs(&node.attrs) else {
            return;
        };

        let (container, _) = self.current();
        let fn_node = self.add_node(
            NodeKind::Function,
            node.sig.ident.unraw().to_string(),
            Some(container),
            doc_lines(&node.attrs),
        );
        let handler = self.handler(fn_node, mapping, &node.sig, &node.attrs, node);
        let controller = self.module_controller(container);
        self.forest.controllers[controller].handlers.push(handler);
    }
}

/// Functions named by `#[validate(schema(function = ".."))]` on a type.
fn cross_field_checks(attrs: &[Attribute]) -> Vec<String> {
    let mut checks = Vec::new();
    for meta in find_all_merged(attrs, "validate") {
        for nested in nested_metas(&meta) {
            if meta_name(&nested).as_deref() != Some("schema") {
                continue;
            }
            for arg in nested_metas(&nested) {
                if !arg.path().is_ident("function") {
                    continue;
                }
                if let Some(function) = meta_str_value(&arg) {
                    let name = function.rsplit("::").next().unwrap_or(&function);
                    checks.push(name.to_string());
                }
            }
        }
    }
    checks
}

/// Field a `&self` method returns unchanged, detected from its body.
fn backing_field_of(sig: &syn::Signature, block: &syn::Block) -> Option<String> {
    if sig.receiver().is_none() || sig.inputs.len() != 1 {
        return None;
    }
    match block.stmts.as_slice() {
        [Stmt::Expr(expr, _)] => self_field(expr),
        _ => None,
    }
}

fn self_field(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Return(ret) => ret.expr.as_deref().and_then(self_field),
        Expr::Reference(reference) => self_field(&reference.expr),
        Expr::Paren(paren) => self_field(&paren.expr),
        Expr::MethodCall(call)
            if call.args.is_empty()
                && ACCESSOR_ADAPTERS.contains(&call.method.to_string().as_str()) =>
        {
            self_field(&call.receiver)
        }
        Expr::Field(field) => match (field.base.as_ref(), &field.member) {
            (Expr::Path(base), syn::Member::Named(ident)) if base.path.is_ident("self") => {
                Some(ident.unraw().to_string())
            }
            _ => None,
        },
        _ => None,
    }
}

/// Source text of an item, attributes and doc comments included.
fn snippet(content: &str, item: &dyn ToTokens) -> String {
    let span = item.to_token_stream().span();
    let start = span.start().line;
    let end = span.end().line;

    if start == 0 || end < start {
        return item.to_token_stream().to_string();
    }

    let lines: Vec<&str> = content
        .lines()
        .skip(start - 1)
        .take(end - start + 1)
        .collect();
    if lines.is_empty() {
        item.to_token_stream().to_string()
    } else {
        lines.join("\n")
    }
}
