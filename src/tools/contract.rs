// ABOUTME: Declarative parameter contracts and their validation
// ABOUTME: Applies defaults, checks types/ranges/enums, and renders the catalog schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Parameter Contracts
//!
//! A [`ParameterContract`] lists the parameters a tool accepts. Raw arguments
//! from the agent runtime are validated against it before anything else
//! happens to a call:
//!
//! 1. `null` arguments count as `{}`; any other non-object is rejected.
//! 2. Each declared parameter, in declaration order: a missing or `null`
//!    value takes the declared default, else is a missing-parameter error
//!    when required, else is left out.
//! 3. Present values are checked against the parameter's [`ParameterKind`].
//! 4. Undeclared keys are dropped.
//!
//! The validated object is then deserialized into the tool's typed params.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use super::schema::{JsonSchema, PropertySchema};
use crate::errors::ToolError;

/// Shape and constraints of one parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// UTF-8 string, optionally length-capped (in characters)
    String {
        /// Longest accepted value
        max_length: Option<usize>,
    },
    /// Whole number within optional inclusive bounds
    Integer {
        /// Smallest accepted value
        min: Option<i64>,
        /// Largest accepted value
        max: Option<i64>,
    },
    /// Any JSON number within optional inclusive bounds
    Number {
        /// Smallest accepted value
        min: Option<f64>,
        /// Largest accepted value
        max: Option<f64>,
    },
    /// `true` or `false`
    Boolean,
    /// Hyphenated UUID string
    Uuid,
    /// RFC 3339 timestamp string
    Timestamp,
    /// One of a fixed set of strings
    Enum {
        /// Accepted values, compared exactly
        values: &'static [&'static str],
    },
}

impl ParameterKind {
    /// Unbounded string
    #[must_use]
    pub const fn string() -> Self {
        Self::String { max_length: None }
    }

    /// String of at most `max_length` characters
    #[must_use]
    pub const fn string_max(max_length: usize) -> Self {
        Self::String {
            max_length: Some(max_length),
        }
    }

    /// Integer in `min..=max`
    #[must_use]
    pub const fn integer_range(min: i64, max: i64) -> Self {
        Self::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    /// One of `values`
    #[must_use]
    pub const fn one_of(values: &'static [&'static str]) -> Self {
        Self::Enum { values }
    }

    fn json_type(&self) -> &'static str {
        match self {
            Self::String { .. } | Self::Uuid | Self::Timestamp | Self::Enum { .. } => "string",
            Self::Integer { .. } => "integer",
            Self::Number { .. } => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Check a present value, returning the rejection reason
    fn check(&self, value: &Value, required: bool) -> Result<(), String> {
        match self {
            Self::String { max_length } => {
                let text = value.as_str().ok_or("expected a string")?;
                if required && text.trim().is_empty() {
                    return Err("must not be empty".to_owned());
                }
                match max_length {
                    Some(max) if text.chars().count() > *max => {
                        Err(format!("must be at most {max} characters"))
                    }
                    _ => Ok(()),
                }
            }
            Self::Integer { min, max } => {
                let number = value.as_i64().ok_or("expected an integer")?;
                check_bounds(number, *min, *max)
            }
            Self::Number { min, max } => {
                let number = value.as_f64().ok_or("expected a number")?;
                check_bounds(number, *min, *max)
            }
            Self::Boolean => value
                .is_boolean()
                .then_some(())
                .ok_or_else(|| "expected a boolean".to_owned()),
            Self::Uuid => {
                let text = value.as_str().ok_or("expected a UUID string")?;
                Uuid::parse_str(text)
                    .map(|_| ())
                    .map_err(|e| format!("invalid UUID: {e}"))
            }
            Self::Timestamp => {
                let text = value.as_str().ok_or("expected an RFC 3339 timestamp string")?;
                DateTime::parse_from_rfc3339(text)
                    .map(|_| ())
                    .map_err(|e| format!("invalid RFC 3339 timestamp: {e}"))
            }
            Self::Enum { values } => {
                let text = value.as_str().ok_or("expected a string")?;
                if values.contains(&text) {
                    Ok(())
                } else {
                    Err(format!("must be one of: {}", values.join(", ")))
                }
            }
        }
    }

    fn to_property(&self, description: &str, default: Option<&Value>) -> PropertySchema {
        let mut property = PropertySchema {
            property_type: self.json_type().to_owned(),
            description: Some(description.to_owned()),
            default: default.cloned(),
            ..PropertySchema::default()
        };
        match self {
            Self::String { max_length } => property.max_length = *max_length,
            Self::Integer { min, max } => {
                property.minimum = min.map(Number::from);
                property.maximum = max.map(Number::from);
            }
            Self::Number { min, max } => {
                property.minimum = min.and_then(Number::from_f64);
                property.maximum = max.and_then(Number::from_f64);
            }
            Self::Boolean => {}
            Self::Uuid => property.format = Some("uuid".to_owned()),
            Self::Timestamp => property.format = Some("date-time".to_owned()),
            Self::Enum { values } => {
                property.enum_values = Some(values.iter().map(|v| (*v).to_owned()).collect());
            }
        }
        property
    }
}

fn check_bounds<T>(value: T, min: Option<T>, max: Option<T>) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    match (min, max) {
        (Some(lo), Some(hi)) if value < lo || value > hi => {
            Err(format!("must be between {lo} and {hi}"))
        }
        (Some(lo), None) if value < lo => Err(format!("must be at least {lo}")),
        (None, Some(hi)) if value > hi => Err(format!("must be at most {hi}")),
        _ => Ok(()),
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    /// Argument key
    pub name: &'static str,
    /// Description shown in the catalog
    pub description: &'static str,
    /// Accepted shape
    pub kind: ParameterKind,
    /// Whether the caller must supply it (when no default applies)
    pub required: bool,
    /// Value used when the argument is missing or `null`
    pub default: Option<Value>,
}

impl ParameterSpec {
    /// A parameter the caller must supply
    #[must_use]
    pub const fn required(name: &'static str, description: &'static str, kind: ParameterKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: true,
            default: None,
        }
    }

    /// A parameter the caller may omit
    #[must_use]
    pub const fn optional(name: &'static str, description: &'static str, kind: ParameterKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: false,
            default: None,
        }
    }

    /// Apply `default` when the argument is missing
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Ordered list of parameters a tool accepts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterContract {
    params: Vec<ParameterSpec>,
}

impl ParameterContract {
    /// A contract accepting no parameters
    #[must_use]
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Declare another parameter
    #[must_use]
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Declared parameters, in declaration order
    #[must_use]
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Look up a declared parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    /// Validate raw arguments, returning the normalized argument object
    ///
    /// # Errors
    ///
    /// Returns `ToolError::MissingParameter` or `ToolError::InvalidParameter`
    pub fn validate(&self, tool_name: &str, raw: Value) -> Result<Map<String, Value>, ToolError> {
        let mut supplied = match raw {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(ToolError::invalid_parameter(
                    tool_name,
                    "arguments",
                    format!("expected a JSON object, got {}", json_kind(&other)),
                ))
            }
        };

        let mut validated = Map::new();
        for spec in &self.params {
            let value = match supplied.remove(spec.name) {
                Some(Value::Null) | None => match &spec.default {
                    Some(default) => default.clone(),
                    None if spec.required => {
                        return Err(ToolError::missing_parameter(tool_name, spec.name))
                    }
                    None => continue,
                },
                Some(value) => value,
            };

            spec.kind
                .check(&value, spec.required)
                .map_err(|reason| ToolError::invalid_parameter(tool_name, spec.name, reason))?;
            validated.insert(spec.name.to_owned(), value);
        }

        Ok(validated)
    }

    /// Validate raw arguments and deserialize them into `P`
    ///
    /// # Errors
    ///
    /// Returns a contract error if validation or deserialization fails
    pub fn parse<P: DeserializeOwned>(&self, tool_name: &str, raw: Value) -> Result<P, ToolError> {
        let validated = self.validate(tool_name, raw)?;
        serde_json::from_value(Value::Object(validated))
            .map_err(|e| ToolError::invalid_parameter(tool_name, "arguments", e.to_string()))
    }

    /// Render as the JSON Schema advertised in the catalog
    #[must_use]
    pub fn to_schema(&self) -> JsonSchema {
        if self.params.is_empty() {
            return JsonSchema::empty_object();
        }

        let properties: BTreeMap<String, PropertySchema> = self
            .params
            .iter()
            .map(|spec| {
                (
                    spec.name.to_owned(),
                    spec.kind.to_property(spec.description, spec.default.as_ref()),
                )
            })
            .collect();
        let required: Vec<String> = self
            .params
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name.to_owned())
            .collect();

        JsonSchema {
            schema_type: "object".to_owned(),
            properties: Some(properties),
            required: (!required.is_empty()).then_some(required),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
