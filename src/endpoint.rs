use crate::route::{CombinedRoute, HttpMethod};
use crate::schema_generator::Schema;
use serde::Serialize;

/// One documented endpoint: a handler reachable at one URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    /// Category the endpoint is grouped under
    pub cat: String,
    pub handler_simple_name: String,
    pub description_lines: Vec<String>,
    pub url: String,
    /// Representative verb, lower-case
    pub http_method: String,
    pub is_deprecated: bool,
    pub request_body_json_schema: Option<Schema>,
    pub response_body_json_schema: Option<Schema>,
    pub author: String,
    pub source_code: String,
}

/// Assembles the endpoint records of one handler.
#[derive(Debug, Clone, Default)]
pub struct EndpointBuilder {
    cat: String,
    handler_simple_name: String,
    description_lines: Vec<String>,
    is_deprecated: bool,
    combined_urls: Vec<String>,
    combined_verbs: Vec<HttpMethod>,
    request_body_json_schema: Option<Schema>,
    response_body_json_schema: Option<Schema>,
    author: String,
    source_code: String,
}

impl EndpointBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cat(mut self, cat: impl Into<String>) -> Self {
        self.cat = cat.into();
        self
    }

    pub fn handler_simple_name(mut self, name: impl Into<String>) -> Self {
        self.handler_simple_name = name.into();
        self
    }

    pub fn description_lines(mut self, lines: Vec<String>) -> Self {
        self.description_lines = lines;
        self
    }

    pub fn is_deprecated(mut self, deprecated: bool) -> Self {
        self.is_deprecated = deprecated;
        self
    }

    /// Takes URLs and verbs from a combined route.
    pub fn route(mut self, route: CombinedRoute) -> Self {
        self.combined_urls = route.combined_urls;
        self.combined_verbs = route.combined_verbs;
        self
    }

    pub fn request_body_json_schema(mut self, schema: Option<Schema>) -> Self {
        self.request_body_json_schema = schema;
        self
    }

    pub fn response_body_json_schema(mut self, schema: Option<Schema>) -> Self {
        self.response_body_json_schema = schema;
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn source_code(mut self, source_code: impl Into<String>) -> Self {
        self.source_code = source_code.into();
        self
    }

    /// One record per combined URL, in URL order.
    pub fn build(self) -> Vec<EndpointRecord> {
        let http_method = representative_verb(&self.combined_verbs).as_str().to_string();

        self.combined_urls
            .iter()
            .map(|url| EndpointRecord {
                cat: self.cat.clone(),
                handler_simple_name: self.handler_simple_name.clone(),
                description_lines: self.description_lines.clone(),
                url: url.clone(),
                http_method: http_method.clone(),
                is_deprecated: self.is_deprecated,
                request_body_json_schema: self.request_body_json_schema.clone(),
                response_body_json_schema: self.response_body_json_schema.clone(),
                author: self.author.clone(),
                source_code: self.source_code.clone(),
            })
            .collect()
    }
}

/// GET if present, else PUT, else DELETE, else POST.
///
/// A handler open to every verb (no verb declared anywhere) is documented as POST.
/// Handlers accepting several verbs are documented under one of them only.
pub fn representative_verb(verbs: &[HttpMethod]) -> HttpMethod {
    if HttpMethod::ALL.iter().all(|verb| verbs.contains(verb)) {
        return HttpMethod::Post;
    }
    [HttpMethod::Get, HttpMethod::Put, HttpMethod::Delete]
        .into_iter()
        .find(|verb| verbs.contains(verb))
        .unwrap_or(HttpMethod::Post)
}
