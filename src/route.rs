use crate::attrs::{expr_str, meta_name, merged_metas};
use log::debug;
use serde::Serialize;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Meta, Token};

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
}

impl HttpMethod {
    /// Every verb, used when neither side of a route names one.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    /// Parse HTTP method from an attribute name or a `method = ".."` value
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "head" => Some(HttpMethod::Head),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    /// Lower-case name as written into endpoint records.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Head => "head",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Paths and verbs declared by one route attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMapping {
    pub paths: Vec<String>,
    pub verbs: Vec<HttpMethod>,
}

impl RequestMapping {
    /// Finds the route attribute of a controller or handler.
    ///
    /// Recognizes verb shorthands (`#[get("/x")]`), the explicit form
    /// (`#[route("/a", "/b", method = "GET")]`) and `#[scope("/prefix")]`, also when
    /// wrapped in `cfg_attr`. The first route attribute wins.
    pub fn from_attrs(attrs: &[Attribute]) -> Option<Self> {
        merged_metas(attrs).iter().find_map(Self::from_meta)
    }

    fn from_meta(meta: &Meta) -> Option<Self> {
        let name = meta_name(meta)?;
        let shorthand = HttpMethod::from_name(&name);
        if shorthand.is_none() && name != "route" && name != "scope" {
            return None;
        }

        let mut mapping = RequestMapping {
            paths: Vec::new(),
            verbs: shorthand.into_iter().collect(),
        };

        let Meta::List(list) = meta else {
            return match meta {
                Meta::Path(_) => Some(mapping),
                _ => None,
            };
        };

        let args = match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
            Ok(args) => args,
            Err(e) => {
                debug!("Ignoring unparsable #[{}] arguments: {}", name, e);
                return None;
            }
        };

        for arg in &args {
            match arg {
                Expr::Assign(assign) => {
                    let is_method = matches!(
                        assign.left.as_ref(),
                        Expr::Path(p) if p.path.is_ident("method")
                    );
                    if !is_method {
                        continue;
                    }
                    match expr_str(&assign.right).as_deref().and_then(HttpMethod::from_name) {
                        Some(verb) => mapping.verbs.push(verb),
                        None => debug!("Unknown HTTP method in #[{}]", name),
                    }
                }
                other => {
                    if let Some(path) = expr_str(other) {
                        mapping.paths.push(path);
                    }
                }
            }
        }

        Some(mapping)
    }
}

/// URLs and verbs of one handler after combination with its controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRoute {
    pub combined_urls: Vec<String>,
    pub combined_verbs: Vec<HttpMethod>,
}

/// Route combiner - joins controller-level and handler-level mappings into concrete routes
///
/// Created once per controller and reused for each of its handlers.
pub struct RouteCombiner {
    controller_paths: Vec<String>,
    controller_verbs: Vec<HttpMethod>,
    global_url_prefix: String,
}

impl RouteCombiner {
    /// Create a combiner for a controller; a missing mapping means no paths and no verbs.
    pub fn new(controller: Option<&RequestMapping>, global_url_prefix: &str) -> Self {
        let (controller_paths, controller_verbs) = match controller {
            Some(mapping) => (mapping.paths.clone(), mapping.verbs.clone()),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            controller_paths,
            controller_verbs,
            global_url_prefix: global_url_prefix.to_string(),
        }
    }

    /// Combine the controller mapping with one handler mapping.
    pub fn analyze(&self, handler: Option<&RequestMapping>) -> CombinedRoute {
        let (handler_paths, handler_verbs): (&[String], &[HttpMethod]) = match handler {
            Some(mapping) => (&mapping.paths, &mapping.verbs),
            None => (&[], &[]),
        };

        let mut combined_urls = combine_urls(&self.controller_paths, handler_paths);
        if !self.global_url_prefix.trim().is_empty() {
            for url in combined_urls.iter_mut() {
                url.insert_str(0, &self.global_url_prefix);
            }
        }

        let mut combined_verbs = self.controller_verbs.clone();
        combined_verbs.extend_from_slice(handler_verbs);
        if combined_verbs.is_empty() {
            combined_verbs = HttpMethod::ALL.to_vec();
        }

        CombinedRoute {
            combined_urls,
            combined_verbs,
        }
    }
}

fn combine_urls(controller_paths: &[String], handler_paths: &[String]) -> Vec<String> {
    let urls: Vec<String> = match (controller_paths.is_empty(), handler_paths.is_empty()) {
        (false, false) => controller_paths
            .iter()
            .flat_map(|c| handler_paths.iter().map(move |m| join_paths(c, m)))
            .collect(),
        (true, false) => handler_paths.to_vec(),
        (false, true) => controller_paths.to_vec(),
        (true, true) => vec!["/".to_string()],
    };

    urls.into_iter()
        .map(|url| {
            if url.starts_with('/') {
                url
            } else {
                format!("/{}", url)
            }
        })
        .collect()
}

/// Joins two path patterns the way Ant-style matchers combine them.
///
/// A trailing `/*` on the controller is replaced by the handler path and `/**` is
/// kept in front of it. A controller made of a `*.ext` file pattern lends its
/// extension to the handler's file name. Everything else is joined with exactly one
/// separating slash. Patterns are not matched against each other, so a handler path
/// the controller pattern already covers is still appended.
fn join_paths(controller: &str, handler: &str) -> String {
    if controller.is_empty() {
        return handler.to_string();
    }
    if handler.is_empty() {
        return controller.to_string();
    }

    if let Some(stem) = controller.strip_suffix("/*") {
        return concat_paths(stem, handler);
    }
    if controller.ends_with("/**") || controller.contains('{') {
        return concat_paths(controller, handler);
    }

    match controller.find("*.") {
        Some(star_dot) => combine_extensions(controller, &controller[star_dot + 1..], handler),
        None => concat_paths(controller, handler),
    }
}

fn combine_extensions(controller: &str, controller_ext: &str, handler: &str) -> String {
    let (file, handler_ext) = match handler.find('.') {
        Some(dot) => (&handler[..dot], &handler[dot..]),
        None => (handler, ""),
    };
    let any_ext = |ext: &str| ext.is_empty() || ext == ".*";

    if any_ext(controller_ext) {
        format!("{}{}", file, handler_ext)
    } else if any_ext(handler_ext) {
        format!("{}{}", file, controller_ext)
    } else {
        debug!(
            "Extensions of {} and {} conflict, joining them as plain paths",
            controller, handler
        );
        concat_paths(controller, handler)
    }
}

fn concat_paths(controller: &str, handler: &str) -> String {
    match (controller.ends_with('/'), handler.starts_with('/')) {
        (true, true) => format!("{}{}", controller, &handler[1..]),
        (false, false) => format!("{}/{}", controller, handler),
        _ => format!("{}{}", controller, handler),
    }
}
