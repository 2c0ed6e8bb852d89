//! Generation requests — the declarative input
//!
//! A `GenerationRequest` names the methods to synthesize in four groups and
//! the global return settings they fall back to.
//!
//! ## Example Request
//!
//! ```yaml
//! publicMethods:
//!   - save
//!   - [find, {parameters: [[req, id]], returnValue: {type: string}, generate: true}]
//!   - count: {returnValue: 3}
//! publicTypeMethods: 2          # method1, method2
//! privateMethods: secret
//! returnValue: ok
//! generate: false
//! ```
//!
//! Per-entry `parameters`, `returnValue` and `generate` replace the global
//! value for that entry. They are never merged.

use crate::double::{Scope, Visibility};
use crate::error::{Error, Result};
use crate::signature::ParameterSpec;
use crate::value::Value;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration for one `generate` run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(
    title = "stubgen request",
    description = "Methods to synthesize on a test double"
)]
pub struct GenerationRequest {
    /// Instance methods, public visibility: name, count or list of entries
    #[serde(default, alias = "public_methods", skip_serializing_if = "Option::is_none")]
    pub public_methods: Option<Value>,

    /// Type-level methods, public visibility
    #[serde(
        default,
        alias = "public_type_methods",
        alias = "publicClassMethods",
        skip_serializing_if = "Option::is_none"
    )]
    pub public_type_methods: Option<Value>,

    /// Instance methods, private visibility
    #[serde(default, alias = "private_methods", skip_serializing_if = "Option::is_none")]
    pub private_methods: Option<Value>,

    /// Type-level methods, private visibility
    #[serde(
        default,
        alias = "private_type_methods",
        alias = "privateClassMethods",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_type_methods: Option<Value>,

    /// Default return value (literal or type descriptor)
    #[serde(default, alias = "return_value", skip_serializing_if = "Option::is_none")]
    pub return_value: Option<Value>,

    /// Default generation flag
    #[serde(default)]
    pub generate: bool,

    /// Seed for the random generator; entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GenerationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public_methods(mut self, methods: impl Into<Value>) -> Self {
        self.public_methods = Some(methods.into());
        self
    }

    pub fn with_public_type_methods(mut self, methods: impl Into<Value>) -> Self {
        self.public_type_methods = Some(methods.into());
        self
    }

    pub fn with_private_methods(mut self, methods: impl Into<Value>) -> Self {
        self.private_methods = Some(methods.into());
        self
    }

    pub fn with_private_type_methods(mut self, methods: impl Into<Value>) -> Self {
        self.private_type_methods = Some(methods.into());
        self
    }

    pub fn with_return_value(mut self, value: impl Into<Value>) -> Self {
        self.return_value = Some(value.into());
        self
    }

    pub fn with_generate(mut self, generate: bool) -> Self {
        self.generate = generate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Raw specification for one group
    pub fn group(&self, kind: GroupKind) -> Option<&Value> {
        match kind {
            GroupKind::PublicInstance => self.public_methods.as_ref(),
            GroupKind::PublicType => self.public_type_methods.as_ref(),
            GroupKind::PrivateInstance => self.private_methods.as_ref(),
            GroupKind::PrivateType => self.private_type_methods.as_ref(),
        }
    }

    /// Parse request from YAML string
    ///
    /// A method group holding a node no `Value` can represent (a tagged node,
    /// a map with non-string keys) is an invalid specification, not a YAML
    /// error.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: serde_norway::Value = serde_norway::from_str(yaml)?;
        if let serde_norway::Value::Mapping(fields) = &document {
            for (key, group) in fields {
                let Some(kind) = key.as_str().and_then(GroupKind::from_field_name) else {
                    continue;
                };
                if let Err(e) = serde_norway::from_value::<Value>(group.clone()) {
                    return Err(Error::invalid_spec(format!(
                        "{}: unsupported method group shape ({})",
                        kind, e
                    )));
                }
            }
        }
        Ok(serde_norway::from_value(document)?)
    }

    /// Serialize request to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Parse request from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize request to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSON Schema describing the request format
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(GenerationRequest);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

/// The four method groups, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    PublicInstance,
    PublicType,
    PrivateInstance,
    PrivateType,
}

impl GroupKind {
    pub const ALL: [GroupKind; 4] = [
        GroupKind::PublicInstance,
        GroupKind::PublicType,
        GroupKind::PrivateInstance,
        GroupKind::PrivateType,
    ];

    pub fn scope(self) -> Scope {
        match self {
            GroupKind::PublicInstance | GroupKind::PrivateInstance => Scope::Instance,
            GroupKind::PublicType | GroupKind::PrivateType => Scope::Type,
        }
    }

    pub fn visibility(self) -> Visibility {
        match self {
            GroupKind::PublicInstance | GroupKind::PublicType => Visibility::Public,
            GroupKind::PrivateInstance | GroupKind::PrivateType => Visibility::Private,
        }
    }

    /// Group for a request field name or one of its aliases
    pub fn from_field_name(field: &str) -> Option<Self> {
        match field {
            "publicMethods" | "public_methods" => Some(GroupKind::PublicInstance),
            "publicTypeMethods" | "public_type_methods" | "publicClassMethods" => {
                Some(GroupKind::PublicType)
            }
            "privateMethods" | "private_methods" => Some(GroupKind::PrivateInstance),
            "privateTypeMethods" | "private_type_methods" | "privateClassMethods" => {
                Some(GroupKind::PrivateType)
            }
            _ => None,
        }
    }

    /// Request field name
    pub fn field_name(self) -> &'static str {
        match self {
            GroupKind::PublicInstance => "publicMethods",
            GroupKind::PublicType => "publicTypeMethods",
            GroupKind::PrivateInstance => "privateMethods",
            GroupKind::PrivateType => "privateTypeMethods",
        }
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Per-entry overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryOptions {
    /// Raw parameter tuples, validated at synthesis
    pub parameters: Option<Vec<Value>>,
    pub return_value: Option<Value>,
    pub generate: Option<bool>,
}

impl EntryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(mut self, params: impl IntoIterator<Item = ParameterSpec>) -> Self {
        self.parameters = Some(params.into_iter().map(Value::from).collect());
        self
    }

    pub fn with_return_value(mut self, value: impl Into<Value>) -> Self {
        self.return_value = Some(value.into());
        self
    }

    pub fn with_generate(mut self, generate: bool) -> Self {
        self.generate = Some(generate);
        self
    }

    /// Read options from an entry's mapping; unknown keys are rejected
    pub fn from_map(map: &BTreeMap<String, Value>) -> Result<Self> {
        let mut options = EntryOptions::default();
        for (key, value) in map {
            match key.as_str() {
                "parameters" | "params" => match value {
                    Value::List(items) => options.parameters = Some(items.clone()),
                    other => {
                        return Err(Error::invalid_spec(format!(
                            "`parameters` must be a list, got {}",
                            other.kind()
                        )))
                    }
                },
                "returnValue" | "return_value" => options.return_value = Some(value.clone()),
                "generate" => match value {
                    Value::Bool(b) => options.generate = Some(*b),
                    other => {
                        return Err(Error::invalid_spec(format!(
                            "`generate` must be a boolean, got {}",
                            other.kind()
                        )))
                    }
                },
                other => {
                    return Err(Error::invalid_spec(format!(
                        "unknown method option `{}`",
                        other
                    )))
                }
            }
        }
        Ok(options)
    }
}

impl From<EntryOptions> for Value {
    fn from(options: EntryOptions) -> Self {
        let mut map = BTreeMap::new();
        if let Some(params) = options.parameters {
            map.insert("parameters".to_string(), Value::List(params));
        }
        if let Some(value) = options.return_value {
            map.insert("returnValue".to_string(), value);
        }
        if let Some(generate) = options.generate {
            map.insert("generate".to_string(), Value::Bool(generate));
        }
        Value::Map(map)
    }
}

impl From<ParameterSpec> for Value {
    fn from(param: ParameterSpec) -> Self {
        let mut tuple = vec![
            Value::String(param.category.short_name().to_string()),
            Value::String(param.name),
        ];
        tuple.extend(param.default);
        Value::List(tuple)
    }
}

/// A list item pairing a method name with its options
pub fn entry(name: &str, options: EntryOptions) -> Value {
    Value::List(vec![Value::from(name), Value::from(options)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeDescriptor;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
publicMethods: 3
private_methods: [secret]
returnValue: {type: integer}
generate: true
seed: 11
"#;
        let request = GenerationRequest::from_yaml(yaml).unwrap();
        assert_eq!(request.public_methods, Some(Value::Int(3)));
        assert_eq!(
            request.private_methods,
            Some(Value::List(vec![Value::from("secret")]))
        );
        assert_eq!(
            request.return_value,
            Some(Value::Type(TypeDescriptor::Integer))
        );
        assert!(request.generate);
        assert_eq!(request.seed, Some(11));
        assert_eq!(request.public_type_methods, None);
    }

    #[test]
    fn test_parse_json() {
        let request =
            GenerationRequest::from_json(r#"{"publicTypeMethods": "build", "returnValue": 5}"#)
                .unwrap();
        assert_eq!(request.public_type_methods, Some(Value::from("build")));
        assert_eq!(request.return_value, Some(Value::Int(5)));
        assert!(!request.generate);
    }

    #[test]
    fn test_unrepresentable_group_is_invalid_specification() {
        for yaml in [
            "publicMethods: {1: a}",
            "publicTypeMethods: !custom thing",
            "private_methods: [save, !tagged load]",
        ] {
            assert!(
                matches!(
                    GenerationRequest::from_yaml(yaml),
                    Err(Error::InvalidSpecification(_))
                ),
                "{}",
                yaml
            );
        }
    }

    #[test]
    fn test_group_kind_from_field_name() {
        for kind in GroupKind::ALL {
            assert_eq!(GroupKind::from_field_name(kind.field_name()), Some(kind));
        }
        assert_eq!(
            GroupKind::from_field_name("privateClassMethods"),
            Some(GroupKind::PrivateType)
        );
        assert_eq!(GroupKind::from_field_name("returnValue"), None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(GenerationRequest::from_yaml("publicMethod: 3").is_err());
    }

    #[test]
    fn test_yaml_round_trip_keeps_type_descriptor() {
        let request = GenerationRequest::new()
            .with_public_methods("find")
            .with_return_value(TypeDescriptor::Symbol)
            .with_generate(true);
        let parsed = GenerationRequest::from_yaml(&request.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_group_lookup() {
        let request = GenerationRequest::new()
            .with_public_methods(2)
            .with_private_type_methods("hidden");
        assert_eq!(request.group(GroupKind::PublicInstance), Some(&Value::Int(2)));
        assert_eq!(
            request.group(GroupKind::PrivateType),
            Some(&Value::from("hidden"))
        );
        assert_eq!(request.group(GroupKind::PublicType), None);
    }

    #[test]
    fn test_group_kind_scope_and_visibility() {
        assert_eq!(GroupKind::PublicType.scope(), Scope::Type);
        assert_eq!(GroupKind::PrivateInstance.scope(), Scope::Instance);
        assert_eq!(GroupKind::PrivateType.visibility(), Visibility::Private);
        assert_eq!(GroupKind::PublicInstance.visibility(), Visibility::Public);
    }

    #[test]
    fn test_entry_options_from_map() {
        let map = BTreeMap::from([
            ("generate".to_string(), Value::Bool(true)),
            ("return_value".to_string(), Value::Type(TypeDescriptor::String)),
            (
                "parameters".to_string(),
                Value::List(vec![Value::from(ParameterSpec::required("id"))]),
            ),
        ]);
        let options = EntryOptions::from_map(&map).unwrap();
        assert_eq!(options.generate, Some(true));
        assert_eq!(
            options.return_value,
            Some(Value::Type(TypeDescriptor::String))
        );
        assert_eq!(options.parameters.map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_entry_options_rejects_unknown_key() {
        let map = BTreeMap::from([("retrun_value".to_string(), Value::Int(1))]);
        assert!(matches!(
            EntryOptions::from_map(&map),
            Err(Error::InvalidSpecification(_))
        ));
    }

    #[test]
    fn test_entry_options_rejects_non_bool_generate() {
        let map = BTreeMap::from([("generate".to_string(), Value::from("yes"))]);
        assert!(EntryOptions::from_map(&map).is_err());
    }

    #[test]
    fn test_parameter_spec_to_tuple() {
        assert_eq!(
            Value::from(ParameterSpec::optional("b", 1)),
            Value::List(vec![Value::from("opt"), Value::from("b"), Value::Int(1)])
        );
    }

    #[test]
    fn test_json_schema_lists_groups() {
        let schema = GenerationRequest::json_schema().unwrap();
        assert!(schema.contains("publicMethods"));
        assert!(schema.contains("privateTypeMethods"));
    }
}
