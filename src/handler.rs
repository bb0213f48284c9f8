use crate::forest::{DeclarationForest, ScopeId};
use crate::type_resolver::{extract_type_info, TypeInfo, TypeResolver};
use log::debug;

/// Body types read from a handler signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerSignature {
    pub request_body: Option<TypeInfo>,
    pub response_body: Option<TypeInfo>,
}

impl HandlerSignature {
    /// Analyze a handler signature; types are resolved from `scope`.
    pub fn analyze(sig: &syn::Signature, forest: &DeclarationForest, scope: ScopeId) -> Self {
        let signature = Self {
            request_body: request_body_type(sig),
            response_body: response_body_type(sig, forest, scope),
        };
        debug!(
            "Handler {}: request body {:?}, response body {:?}",
            sig.ident,
            signature.request_body.as_ref().map(|t| &t.name),
            signature.response_body.as_ref().map(|t| &t.name)
        );
        signature
    }
}

/// `T` of the first parameter typed `Json<T>` (`web::Json<T>`, `actix_web::web::Json<T>`, ...).
pub fn request_body_type(sig: &syn::Signature) -> Option<TypeInfo> {
    sig.inputs.iter().find_map(|input| match input {
        syn::FnArg::Typed(pat_type) => json_payload(&extract_type_info(&pat_type.ty)),
        syn::FnArg::Receiver(_) => None,
    })
}

/// Response body of a handler.
///
/// `Result<X, E>` is unwrapped to `X` and `Json<T>` to `T`. Any other type counts only
/// when it is declared in the project, so `HttpResponse` or `impl Responder` yield `None`.
pub fn response_body_type(
    sig: &syn::Signature,
    forest: &DeclarationForest,
    scope: ScopeId,
) -> Option<TypeInfo> {
    let syn::ReturnType::Type(_, ty) = &sig.output else {
        return None;
    };
    if matches!(ty.as_ref(), syn::Type::ImplTrait(_)) {
        return None;
    }

    let mut type_info = extract_type_info(ty);
    if type_info.name == "Result" && !type_info.generic_args.is_empty() {
        type_info = type_info.generic_args.swap_remove(0);
    }

    if let Some(payload) = json_payload(&type_info) {
        return Some(payload);
    }

    TypeResolver::new(forest)
        .resolve(&type_info, scope)
        .map(|_| type_info)
}

fn json_payload(type_info: &TypeInfo) -> Option<TypeInfo> {
    if type_info.name == "Json" {
        type_info.single_type_argument().cloned()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tests::forest_from_files;

    fn signature(code: &str) -> syn::Signature {
        let item: syn::ItemFn = syn::parse_str(code).unwrap();
        item.sig
    }

    #[test]
    fn test_request_body_from_json_extractor() {
        let sig = signature(
            "async fn create(path: web::Path<u32>, body: web::Json<CreateUser>) -> HttpResponse { todo!() }",
        );
        assert_eq!(request_body_type(&sig).unwrap().name, "CreateUser");

        let sig = signature("async fn list(query: web::Query<Filter>) -> HttpResponse { todo!() }");
        assert!(request_body_type(&sig).is_none());
    }

    #[test]
    fn test_response_body_variants() {
        let forest = forest_from_files(&[(
            "src/api.rs",
            "pub struct User { pub id: u32 }",
        )]);
        let scope = forest.file_scope(0);

        let sig = signature("async fn a() -> Result<Json<Vec<User>>, Error> { todo!() }");
        let body = response_body_type(&sig, &forest, scope).unwrap();
        assert_eq!(body.name, "Vec");
        assert_eq!(body.generic_args[0].name, "User");

        let sig = signature("async fn b() -> User { todo!() }");
        assert_eq!(response_body_type(&sig, &forest, scope).unwrap().name, "User");

        let sig = signature("async fn c() -> HttpResponse { todo!() }");
        assert!(response_body_type(&sig, &forest, scope).is_none());

        let sig = signature("async fn d() -> impl Responder { todo!() }");
        assert!(response_body_type(&sig, &forest, scope).is_none());

        let sig = signature("async fn e() { }");
        assert!(response_body_type(&sig, &forest, scope).is_none());
    }
}
