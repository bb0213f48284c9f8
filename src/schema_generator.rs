use crate::attrs::{apply_rename_rule, find_format_pattern, parse_serde_attributes};
use crate::field_meta::FieldMetadataTable;
use crate::forest::{DeclarationForest, FieldDecl, Member, ScopeId, TypeDecl, TypeKind};
use crate::type_resolver::{parse_primitive_type, PrimitiveType, TypeInfo, TypeResolver};
use crate::validation::{
    discover_inner, discover_member, CustomValidationStrategy, NoopValidationStrategy,
    ValidatorDescriptor,
};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// JSON schema of a request or response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// `urn:jsonschema:` identifier of a struct schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Serialized [`PropertyDescriptor`] for object properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Properties for object types, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Enum values for enum types
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Id of a schema that is already being expanded
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Format for primitive types (e.g., "int32", "int64", "float", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Value schema for map types
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<Schema>>,
}

impl Schema {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }
}

/// Metadata bundle written into the `description` of each property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub description_lines: Vec<String>,
    pub valids: Vec<ValidatorDescriptor>,
    pub is_field_crossing_valids: bool,
    pub doc_ignore: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_pattern: Option<String>,
}

/// Serde attributes that change the serialized shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationAttr {
    /// `#[serde(with = "..")]` or `#[serde(serialize_with = "..")]`
    SerializeWith,
}

/// Decisions the schema generator delegates while walking a type.
pub trait Introspector {
    /// Whether `member` of `owner` is left out of the schema.
    fn has_ignore_marker(&self, owner: &TypeDecl, member: &Member<'_>) -> bool;

    /// Text for the `description` slot of the property generated for `member`.
    fn description_for(&self, owner: &TypeDecl, member: &Member<'_>) -> Option<String>;

    /// Whether a shape-changing serde attribute is ignored.
    fn is_serialization_attr_suppressed(&self, attr: SerializationAttr) -> bool;
}

/// Ignore logic used when the field table has no entry: `#[serde(skip)]` and
/// `#[serde(skip_serializing)]`.
pub fn default_ignore_marker(member: &Member<'_>) -> bool {
    match member {
        Member::Field(field) => field.serde.skip,
        Member::Method(_) => false,
    }
}

/// Introspector backed by the field table and validation discovery
pub struct DocIntrospector<'a> {
    table: &'a FieldMetadataTable,
    strategy: Box<dyn CustomValidationStrategy + 'a>,
}

impl<'a> DocIntrospector<'a> {
    pub fn new(
        table: &'a FieldMetadataTable,
        strategy: Box<dyn CustomValidationStrategy + 'a>,
    ) -> Self {
        Self { table, strategy }
    }

    fn backing_field<'t>(&self, owner: &'t TypeDecl, member: &Member<'t>) -> Option<&'t FieldDecl> {
        match member {
            Member::Field(field) => Some(*field),
            Member::Method(method) => method
                .backing_field
                .as_deref()
                .and_then(|name| owner.field(name)),
        }
    }

    fn descriptor_for(&self, owner: &TypeDecl, member: &Member<'_>) -> PropertyDescriptor {
        let valids = discover_member(self.strategy.as_ref(), member.name(), member.attrs());

        let Some(field) = self.backing_field(owner, member) else {
            // Validation-only member
            let mut descriptor = PropertyDescriptor::default();
            if let Member::Method(method) = member {
                if method.is_cross_field_check {
                    descriptor.is_field_crossing_valids = true;
                    descriptor.valids = valids;
                }
            }
            return descriptor;
        };

        let mut descriptor = owner
            .qualifier
            .as_deref()
            .and_then(|qualifier| self.table.get(qualifier, &field.name))
            .map(|entry| PropertyDescriptor {
                description_lines: entry.description_lines.clone(),
                doc_ignore: entry.doc_ignore,
                ..PropertyDescriptor::default()
            })
            .unwrap_or_default();
        descriptor.valids = valids;

        if field.type_info.is_collection() && field.type_info.single_type_argument().is_some() {
            descriptor.valids.extend(discover_inner(
                self.strategy.as_ref(),
                &field.name,
                &field.attrs,
            ));
        }

        descriptor.format_pattern = find_format_pattern(&field.attrs);
        descriptor
    }
}

impl Introspector for DocIntrospector<'_> {
    fn has_ignore_marker(&self, owner: &TypeDecl, member: &Member<'_>) -> bool {
        let entry = owner
            .qualifier
            .as_deref()
            .and_then(|qualifier| self.table.get(qualifier, member.name()));
        match entry {
            Some(entry) => entry.doc_ignore,
            None => default_ignore_marker(member),
        }
    }

    fn description_for(&self, owner: &TypeDecl, member: &Member<'_>) -> Option<String> {
        let descriptor = self.descriptor_for(owner, member);
        match serde_json::to_string(&descriptor) {
            Ok(json) => Some(json),
            Err(e) => {
                debug!("Cannot serialize description of {}: {}", member.name(), e);
                None
            }
        }
    }

    fn is_serialization_attr_suppressed(&self, _attr: SerializationAttr) -> bool {
        true
    }
}

/// Schema generator - converts Rust types to JSON schemas
///
/// Struct schemas are generated inline. A type that is already being expanded
/// further up the current path is emitted as a `$ref` to its id.
pub struct SchemaGenerator<'a> {
    resolver: TypeResolver<'a>,
    introspector: Box<dyn Introspector + 'a>,
}

/// Builds the generator for one documentation run.
///
/// # Arguments
///
/// * `forest` - The declaration forest of the project
/// * `table` - The complete field description table
/// * `strategy` - Custom validation strategy; `None` uses [`NoopValidationStrategy`]
pub fn build_generator<'a>(
    forest: &'a DeclarationForest,
    table: &'a FieldMetadataTable,
    strategy: Option<Box<dyn CustomValidationStrategy + 'a>>,
) -> SchemaGenerator<'a> {
    let strategy = strategy.unwrap_or_else(|| Box::new(NoopValidationStrategy));
    SchemaGenerator::new(forest, Box::new(DocIntrospector::new(table, strategy)))
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(forest: &'a DeclarationForest, introspector: Box<dyn Introspector + 'a>) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            resolver: TypeResolver::new(forest),
            introspector,
        }
    }

    /// Generate a schema for a type as written in `scope`
    pub fn generate(&self, type_info: &TypeInfo, scope: ScopeId) -> Schema {
        debug!("Generating schema for type: {}", type_info.name);
        self.generate_in(type_info, scope, &mut Vec::new())
    }

    /// Generate the schema of a type declaration
    pub fn generate_for_decl(&self, decl: &TypeDecl) -> Schema {
        self.decl_schema(decl, &mut Vec::new())
    }

    fn generate_in(&self, type_info: &TypeInfo, scope: ScopeId, visiting: &mut Vec<String>) -> Schema {
        if type_info.is_option() || type_info.is_transparent() {
            return self.generate_in(&type_info.generic_args[0], scope, visiting);
        }

        if type_info.is_collection() {
            let items = match type_info.generic_args.first() {
                Some(element) => self.generate_in(element, scope, visiting),
                None => Schema::of_type("object"),
            };
            return Schema {
                items: Some(Box::new(items)),
                ..Schema::of_type("array")
            };
        }

        if type_info.is_map() {
            let values = match type_info.generic_args.get(1) {
                Some(value) => self.generate_in(value, scope, visiting),
                None => Schema::of_type("object"),
            };
            return Schema {
                additional_properties: Some(Box::new(values)),
                ..Schema::of_type("object")
            };
        }

        if let Some(primitive) = parse_primitive_type(&type_info.name) {
            return primitive_to_schema(&primitive);
        }

        if let Some(decl) = self.resolver.resolve(type_info, scope) {
            return self.decl_schema(decl, visiting);
        }

        if type_info.is_string_like() {
            return Schema::of_type("string");
        }

        // Fallback for unknown types
        debug!("Unknown type: {}, using object placeholder", type_info.name);
        Schema::of_type("object")
    }

    fn decl_schema(&self, decl: &TypeDecl, visiting: &mut Vec<String>) -> Schema {
        let id = decl
            .qualifier
            .as_ref()
            .map(|qualifier| format!("urn:jsonschema:{}", qualifier.replace("::", ":")));
        let key = decl.qualifier.clone().unwrap_or_else(|| decl.name.clone());

        if visiting.contains(&key) {
            debug!("{} is already being expanded, emitting a reference", key);
            return Schema {
                reference: Some(id.unwrap_or(key)),
                ..Schema::default()
            };
        }

        match decl.kind {
            TypeKind::Enum => self.enum_schema(decl),
            TypeKind::Trait => Schema {
                id,
                ..Schema::of_type("object")
            },
            TypeKind::Struct | TypeKind::Union => {
                visiting.push(key);
                let schema = self.object_schema(decl, id, visiting);
                visiting.pop();
                schema
            }
        }
    }

    fn object_schema(&self, decl: &TypeDecl, id: Option<String>, visiting: &mut Vec<String>) -> Schema {
        debug!("Generating struct schema for: {}", decl.name);

        let container_default = parse_serde_attributes(&decl.attrs).default;
        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for member in decl.members() {
            if self.introspector.has_ignore_marker(decl, &member) {
                continue;
            }

            match member {
                Member::Field(field) if field.serde.flatten => {
                    let nested = self.generate_in(&field.type_info, decl.scope, visiting);
                    properties.extend(nested.properties.unwrap_or_default());
                    required.extend(nested.required.unwrap_or_default());
                }
                Member::Field(field) => {
                    let name = property_name(decl, field);
                    let mut property = if field.serde.serialize_with.is_some()
                        && !self
                            .introspector
                            .is_serialization_attr_suppressed(SerializationAttr::SerializeWith)
                    {
                        Schema::default()
                    } else {
                        self.generate_in(&field.type_info, decl.scope, visiting)
                    };
                    property.description = self.introspector.description_for(decl, &member);

                    if !field.type_info.is_option() && !field.serde.default && !container_default {
                        required.push(name.clone());
                    }
                    properties.insert(name, property);
                }
                Member::Method(method) => {
                    let property = Schema {
                        description: self.introspector.description_for(decl, &member),
                        ..Schema::default()
                    };
                    properties.insert(method.name.clone(), property);
                }
            }
        }

        Schema {
            id,
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required)
            },
            ..Schema::of_type("object")
        }
    }

    fn enum_schema(&self, decl: &TypeDecl) -> Schema {
        debug!("Generating enum schema for: {}", decl.name);

        let values = decl
            .variants
            .iter()
            .filter(|variant| !variant.serde.skip)
            .map(|variant| match (&variant.serde.rename, &decl.rename_all) {
                (Some(rename), _) => rename.clone(),
                (None, Some(rule)) => apply_rename_rule(rule, &variant.name),
                (None, None) => variant.name.clone(),
            })
            .collect();

        Schema {
            enum_values: Some(values),
            ..Schema::of_type("string")
        }
    }
}

fn property_name(decl: &TypeDecl, field: &FieldDecl) -> String {
    match (&field.serde.rename, &decl.rename_all) {
        (Some(rename), _) => rename.clone(),
        (None, Some(rule)) => apply_rename_rule(rule, &field.name),
        (None, None) => field.name.clone(),
    }
}

/// Convert a primitive type to a schema
fn primitive_to_schema(primitive: &PrimitiveType) -> Schema {
    let (schema_type, format) = match primitive {
        PrimitiveType::String => ("string", None),
        PrimitiveType::I8 | PrimitiveType::I16 | PrimitiveType::I32 => ("integer", Some("int32")),
        PrimitiveType::I64 | PrimitiveType::I128 => ("integer", Some("int64")),
        PrimitiveType::U8 | PrimitiveType::U16 | PrimitiveType::U32 => ("integer", Some("int32")),
        PrimitiveType::U64 | PrimitiveType::U128 => ("integer", Some("int64")),
        PrimitiveType::F32 => ("number", Some("float")),
        PrimitiveType::F64 => ("number", Some("double")),
        PrimitiveType::Bool => ("boolean", None),
        PrimitiveType::Char => ("string", None),
    };

    Schema {
        format: format.map(|s| s.to_string()),
        ..Schema::of_type(schema_type)
    }
}
