// ABOUTME: JSON Schema types advertised in the tool catalog
// ABOUTME: Each tool's parameter contract renders to one of these for the calling model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// JSON Schema definition for a tool's input object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Always `object` for tool inputs
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Declared parameters by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertySchema>>,
    /// Names of required parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl JsonSchema {
    /// An object schema with no properties
    #[must_use]
    pub fn empty_object() -> Self {
        Self {
            schema_type: "object".to_owned(),
            properties: None,
            required: None,
        }
    }
}

/// Schema for a single parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type (`string`, `integer`, `number`, `boolean`)
    #[serde(rename = "type")]
    pub property_type: String,
    /// Human-readable description for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Inclusive lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    /// Inclusive upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    /// Longest accepted string, in characters
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// String format hint (`uuid`, `date-time`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Value applied when the parameter is omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Catalog entry for one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name used to invoke it
    pub name: String,
    /// What the tool does, written for the calling model
    pub description: String,
    /// Parameter contract
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}
