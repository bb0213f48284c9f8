use crate::comments::{description_section, CommentResolver};
use crate::config::DocAnalyzerConfig;
use crate::endpoint::{EndpointBuilder, EndpointRecord};
use crate::error::Result;
use crate::field_meta::FieldMetadataCollector;
use crate::forest::DeclarationForest;
use crate::handler::HandlerSignature;
use crate::route::RouteCombiner;
use crate::schema_generator::build_generator;
use crate::validation::{AnnotatedElement, CustomValidationStrategy, ValidatorDescriptor};
use log::{debug, info};

/// One documentation run over a declaration forest.
///
/// The run has two phases. The field description table is collected completely
/// first; only then is the schema generator built and each handler documented.
pub struct DocAnalyzer<'a> {
    forest: &'a DeclarationForest,
    config: &'a DocAnalyzerConfig,
    strategy: Option<&'a dyn CustomValidationStrategy>,
}

impl<'a> DocAnalyzer<'a> {
    pub fn new(forest: &'a DeclarationForest, config: &'a DocAnalyzerConfig) -> Self {
        Self {
            forest,
            config,
            strategy: None,
        }
    }

    pub fn with_validation_strategy(mut self, strategy: &'a dyn CustomValidationStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Documents every handler of every controller, in source order.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::error::Error::QualifierAbsent`] when a type of the forest has
    /// no fully-qualified name.
    pub fn analyze(&self) -> Result<Vec<EndpointRecord>> {
        let table =
            FieldMetadataCollector::collect(self.forest, self.config.field_descriptions.as_ref())?;

        let strategy = self
            .strategy
            .map(|s| -> Box<dyn CustomValidationStrategy + 'a> { Box::new(StrategyRef(s)) });
        let generator = build_generator(self.forest, &table, strategy);
        let comments = CommentResolver::new(self.forest);

        let mut records = Vec::new();
        for controller in self.forest.controllers() {
            debug!(
                "Documenting controller {} ({} handlers)",
                controller.name,
                controller.handlers.len()
            );

            let combiner =
                RouteCombiner::new(controller.mapping.as_ref(), &self.config.global_url_prefix);
            let cat = comments
                .resolve_description(controller.node)
                .into_iter()
                .next()
                .unwrap_or_else(|| controller.name.clone());

            for handler in &controller.handlers {
                let signature = HandlerSignature::analyze(&handler.signature, self.forest, handler.scope);
                let request_schema = signature
                    .request_body
                    .map(|body| generator.generate(&body, handler.scope));
                let response_schema = signature
                    .response_body
                    .map(|body| generator.generate(&body, handler.scope));

                let mut author = comments.resolve_author(handler.node);
                if author.is_empty() {
                    author = comments.resolve_file_author(self.forest.file(handler.file));
                }

                let endpoints = EndpointBuilder::new()
                    .cat(cat.clone())
                    .handler_simple_name(handler.name.clone())
                    .description_lines(description_section(
                        &self.forest.node(handler.node).doc_lines,
                    ))
                    .is_deprecated(handler.deprecated || controller.deprecated)
                    .route(combiner.analyze(handler.mapping.as_ref()))
                    .request_body_json_schema(request_schema)
                    .response_body_json_schema(response_schema)
                    .author(author)
                    .source_code(handler.source_code.clone())
                    .build();
                records.extend(endpoints);
            }
        }

        info!("Documented {} endpoint(s)", records.len());
        Ok(records)
    }
}

/// Lends a borrowed strategy to the generator, which owns its strategy.
struct StrategyRef<'s>(&'s dyn CustomValidationStrategy);

impl CustomValidationStrategy for StrategyRef<'_> {
    fn analyze_custom_validation(&self, element: &AnnotatedElement<'_>) -> Vec<ValidatorDescriptor> {
        self.0.analyze_custom_validation(element)
    }
}
