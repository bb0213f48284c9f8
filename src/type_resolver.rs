use crate::forest::{DeclarationForest, ScopeId, TypeDecl};
use log::debug;
use std::collections::BTreeMap;

/// Containers whose single type argument is the element type.
const COLLECTION_TYPES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
    "IndexSet",
    "[]",
];

const MAP_TYPES: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// Wrappers that serialize exactly like their content.
const TRANSPARENT_TYPES: &[&str] = &["Box", "Rc", "Arc", "Cow", "RefCell", "Cell"];

/// Types from the date, time and uuid crates that serialize as strings.
const STRING_LIKE_TYPES: &[&str] = &[
    "NaiveDate",
    "NaiveTime",
    "NaiveDateTime",
    "DateTime",
    "Date",
    "Time",
    "PrimitiveDateTime",
    "OffsetDateTime",
    "Uuid",
    "Decimal",
    "PathBuf",
];

/// Type information extracted from Rust code for schema generation.
///
/// `name` is the raw type (the last path segment), so `Vec<String>` has name `Vec`
/// and one generic argument. Slices and arrays use the name `[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// The base type name (e.g., "String", "User", "Vec")
    pub name: String,
    /// Path segments as written (e.g., `["crate", "dto", "User"]`)
    pub path: Vec<String>,
    /// Generic type arguments, lifetimes and const arguments excluded
    pub generic_args: Vec<TypeInfo>,
}

impl TypeInfo {
    /// Create a new TypeInfo for a simple type
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: vec![name.clone()],
            name,
            generic_args: Vec::new(),
        }
    }

    /// Create a TypeInfo for a generic type such as `Vec<T>`
    pub fn generic(name: impl Into<String>, generic_args: Vec<TypeInfo>) -> Self {
        Self {
            generic_args,
            ..Self::new(name)
        }
    }

    pub fn unknown() -> Self {
        Self {
            name: "Unknown".to_string(),
            path: Vec::new(),
            generic_args: Vec::new(),
        }
    }

    pub fn is_option(&self) -> bool {
        self.name == "Option" && self.generic_args.len() == 1
    }

    /// Whether the raw type is a single-element container.
    pub fn is_collection(&self) -> bool {
        COLLECTION_TYPES.contains(&self.name.as_str())
    }

    pub fn is_map(&self) -> bool {
        MAP_TYPES.contains(&self.name.as_str())
    }

    pub fn is_transparent(&self) -> bool {
        TRANSPARENT_TYPES.contains(&self.name.as_str()) && self.generic_args.len() == 1
    }

    pub fn is_string_like(&self) -> bool {
        STRING_LIKE_TYPES.contains(&self.name.as_str())
    }

    /// The only type argument, when there is exactly one.
    pub fn single_type_argument(&self) -> Option<&TypeInfo> {
        match self.generic_args.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Extract TypeInfo from a syn::Type
pub fn extract_type_info(ty: &syn::Type) -> TypeInfo {
    match ty {
        syn::Type::Path(type_path) => extract_type_info_from_path(&type_path.path),
        syn::Type::Reference(reference) => extract_type_info(&reference.elem),
        syn::Type::Paren(paren) => extract_type_info(&paren.elem),
        syn::Type::Group(group) => extract_type_info(&group.elem),
        syn::Type::Slice(slice) => TypeInfo {
            name: "[]".to_string(),
            path: Vec::new(),
            generic_args: vec![extract_type_info(&slice.elem)],
        },
        syn::Type::Array(array) => TypeInfo {
            name: "[]".to_string(),
            path: Vec::new(),
            generic_args: vec![extract_type_info(&array.elem)],
        },
        _ => TypeInfo::unknown(),
    }
}

/// Extract TypeInfo from a syn::Path
pub fn extract_type_info_from_path(path: &syn::Path) -> TypeInfo {
    let Some(segment) = path.segments.last() else {
        return TypeInfo::unknown();
    };

    let mut generic_args = Vec::new();
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(inner_ty) = arg {
                generic_args.push(extract_type_info(inner_ty));
            }
        }
    }

    TypeInfo {
        name: segment.ident.to_string(),
        path: path.segments.iter().map(|s| s.ident.to_string()).collect(),
        generic_args,
    }
}

/// Primitive types supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Bool,
    Char,
}

/// Parse a primitive type name
pub fn parse_primitive_type(type_name: &str) -> Option<PrimitiveType> {
    match type_name {
        "String" | "str" => Some(PrimitiveType::String),
        "i8" => Some(PrimitiveType::I8),
        "i16" => Some(PrimitiveType::I16),
        "i32" | "isize" => Some(PrimitiveType::I32),
        "i64" => Some(PrimitiveType::I64),
        "i128" => Some(PrimitiveType::I128),
        "u8" => Some(PrimitiveType::U8),
        "u16" => Some(PrimitiveType::U16),
        "u32" | "usize" => Some(PrimitiveType::U32),
        "u64" => Some(PrimitiveType::U64),
        "u128" => Some(PrimitiveType::U128),
        "f32" => Some(PrimitiveType::F32),
        "f64" => Some(PrimitiveType::F64),
        "bool" => Some(PrimitiveType::Bool),
        "char" => Some(PrimitiveType::Char),
        _ => None,
    }
}

/// `use` declarations visible in one module scope.
#[derive(Debug, Clone, Default)]
pub struct Imports {
    /// Imported name (or alias) -> path segments as written
    pub names: BTreeMap<String, Vec<String>>,
    /// Path segments of glob imports
    pub globs: Vec<Vec<String>>,
}

impl Imports {
    /// Records every name a `use` tree brings into scope.
    pub fn collect(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.collect(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(name) => {
                if name.ident == "self" {
                    if let Some(last) = prefix.last() {
                        self.names.insert(last.clone(), prefix.clone());
                    }
                } else {
                    let mut full = prefix.clone();
                    full.push(name.ident.to_string());
                    self.names.insert(name.ident.to_string(), full);
                }
            }
            syn::UseTree::Rename(rename) => {
                let mut full = prefix.clone();
                full.push(rename.ident.to_string());
                self.names.insert(rename.rename.to_string(), full);
            }
            syn::UseTree::Glob(_) => self.globs.push(prefix.clone()),
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.collect(item, prefix);
                }
            }
        }
    }
}

/// Turns written path segments into absolute candidates seen from `module`.
///
/// Paths that do not start with `crate`, `self` or `super` may be module-relative or
/// name an external crate, so both readings are returned.
pub fn absolutize(segments: &[String], module: &str) -> Vec<String> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };

    match first.as_str() {
        "crate" => vec![join_under(crate_root(module), &segments[1..])],
        "self" => vec![join_under(module, &segments[1..])],
        "super" => {
            let mut base = module.to_string();
            let mut rest = segments;
            while rest.first().map(String::as_str) == Some("super") {
                match base.rfind("::") {
                    Some(pos) => base.truncate(pos),
                    None => return Vec::new(),
                }
                rest = &rest[1..];
            }
            vec![join_under(&base, rest)]
        }
        _ => vec![join_under(module, segments), segments.join("::")],
    }
}

/// First segment of a module path: `crate` for the library, a target name otherwise.
fn crate_root(module: &str) -> &str {
    module.split("::").next().unwrap_or(module)
}

fn join_under(base: &str, rest: &[String]) -> String {
    if rest.is_empty() {
        base.to_string()
    } else {
        format!("{}::{}", base, rest.join("::"))
    }
}

/// Type resolver - maps type paths, as written in some module, to type declarations
pub struct TypeResolver<'a> {
    forest: &'a DeclarationForest,
}

impl<'a> TypeResolver<'a> {
    pub fn new(forest: &'a DeclarationForest) -> Self {
        Self { forest }
    }

    /// Resolve a type as written in `scope`.
    pub fn resolve(&self, type_info: &TypeInfo, scope: ScopeId) -> Option<&'a TypeDecl> {
        self.resolve_path(&type_info.path, scope)
    }

    /// Resolve written path segments to a declaration.
    ///
    /// Tries the path itself, `use` imports and glob imports of the scope, then falls
    /// back to a search by simple name across the whole forest.
    pub fn resolve_path(&self, segments: &[String], scope: ScopeId) -> Option<&'a TypeDecl> {
        let name = segments.last()?;

        for candidate in self.candidates(segments, scope) {
            if let Some(decl) = self.forest.type_by_qualifier(&candidate) {
                return Some(decl);
            }
        }

        let named = self.forest.types_named(name);
        if named.len() > 1 {
            debug!(
                "Type name {} is ambiguous ({} declarations), using the first one",
                name,
                named.len()
            );
        }
        named.into_iter().next()
    }

    /// Fully-qualified name of a written type, if it resolves.
    pub fn qualifier_of(&self, type_info: &TypeInfo, scope: ScopeId) -> Option<&'a str> {
        self.resolve(type_info, scope)
            .and_then(|decl| decl.qualifier.as_deref())
    }

    fn candidates(&self, segments: &[String], scope: ScopeId) -> Vec<String> {
        let scope = self.forest.scope(scope);
        let Some(module) = scope.module_path.as_deref() else {
            return Vec::new();
        };

        let mut candidates = Vec::new();

        if let Some(imported) = scope.imports.names.get(&segments[0]) {
            let mut full = imported.clone();
            full.extend(segments[1..].iter().cloned());
            candidates.extend(absolutize(&full, module));
        }

        candidates.extend(absolutize(segments, module));

        for glob in &scope.imports.globs {
            let mut full = glob.clone();
            full.extend(segments.iter().cloned());
            candidates.extend(absolutize(&full, module));
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tests::forest_from_files;

    fn type_of(code: &str) -> TypeInfo {
        let ty: syn::Type = syn::parse_str(code).unwrap();
        extract_type_info(&ty)
    }

    #[test]
    fn test_extract_simple_and_generic_types() {
        let simple = type_of("String");
        assert_eq!(simple.name, "String");
        assert!(simple.generic_args.is_empty());

        let vec = type_of("Vec<crate::dto::User>");
        assert_eq!(vec.name, "Vec");
        assert!(vec.is_collection());
        let element = vec.single_type_argument().unwrap();
        assert_eq!(element.name, "User");
        assert_eq!(element.path, vec!["crate", "dto", "User"]);
    }

    #[test]
    fn test_extract_references_slices_and_lifetimes() {
        let reference = type_of("&'a str");
        assert_eq!(reference.name, "str");

        let slice = type_of("&[u8]");
        assert!(slice.is_collection());
        assert_eq!(slice.generic_args[0].name, "u8");

        let cow = type_of("Cow<'a, str>");
        assert!(cow.is_transparent());
        assert_eq!(cow.generic_args.len(), 1);

        let map = type_of("HashMap<String, i64>");
        assert!(map.is_map());
        assert!(map.single_type_argument().is_none());
    }

    #[test]
    fn test_option_of_vec() {
        let ty = type_of("Option<Vec<String>>");
        assert!(ty.is_option());
        assert!(!ty.is_collection());
        assert!(ty.generic_args[0].is_collection());
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(parse_primitive_type("String"), Some(PrimitiveType::String));
        assert_eq!(parse_primitive_type("u64"), Some(PrimitiveType::U64));
        assert_eq!(parse_primitive_type("bool"), Some(PrimitiveType::Bool));
        assert_eq!(parse_primitive_type("User"), None);
    }

    #[test]
    fn test_collect_use_tree() {
        let item: syn::ItemUse =
            syn::parse_str("use crate::dto::{User, Page as Paged, sub::{self, *}};").unwrap();
        let mut imports = Imports::default();
        imports.collect(&item.tree, &mut Vec::new());

        assert_eq!(imports.names["User"], vec!["crate", "dto", "User"]);
        assert_eq!(imports.names["Paged"], vec!["crate", "dto", "Page"]);
        assert_eq!(imports.names["sub"], vec!["crate", "dto", "sub"]);
        assert_eq!(imports.globs, vec![vec!["crate", "dto", "sub"]]);
    }

    #[test]
    fn test_absolutize() {
        let seg = |s: &str| s.split("::").map(String::from).collect::<Vec<_>>();
        assert_eq!(absolutize(&seg("crate::a::B"), "crate::x"), vec!["crate::a::B"]);
        assert_eq!(absolutize(&seg("self::B"), "crate::x"), vec!["crate::x::B"]);
        assert_eq!(absolutize(&seg("super::super::B"), "crate::x::y"), vec!["crate::B"]);
        assert_eq!(
            absolutize(&seg("models::B"), "crate"),
            vec!["crate::models::B", "models::B"]
        );
        assert!(absolutize(&seg("super::B"), "crate").is_empty());

        // `crate` names the root of the crate the module belongs to
        assert_eq!(
            absolutize(&seg("crate::dto::B"), "hello_world::handlers"),
            vec!["hello_world::dto::B"]
        );
    }

    #[test]
    fn test_resolve_through_imports_and_fallback() {
        let forest = forest_from_files(&[
            (
                "src/dto.rs",
                r#"
                pub struct User { pub id: u32 }
                pub struct Page { pub size: u32 }
                "#,
            ),
            (
                "src/api.rs",
                r#"
                use crate::dto::User as Account;
                use crate::dto::*;
                pub struct Local;
                "#,
            ),
        ]);
        let resolver = TypeResolver::new(&forest);
        let api_scope = forest.file_scope(1);

        let account = resolver.resolve(&TypeInfo::new("Account"), api_scope).unwrap();
        assert_eq!(account.qualifier.as_deref(), Some("crate::dto::User"));

        let page = resolver.resolve(&TypeInfo::new("Page"), api_scope).unwrap();
        assert_eq!(page.qualifier.as_deref(), Some("crate::dto::Page"));

        let local = resolver.qualifier_of(&TypeInfo::new("Local"), api_scope);
        assert_eq!(local, Some("crate::api::Local"));

        // Not imported in dto.rs, found by simple name
        let dto_scope = forest.file_scope(0);
        assert!(resolver.resolve(&TypeInfo::new("Local"), dto_scope).is_some());
        assert!(resolver.resolve(&TypeInfo::new("Missing"), dto_scope).is_none());
    }
}
