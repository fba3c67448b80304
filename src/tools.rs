//! Tool descriptors handed to the voice model
//!
//! A tool is a webhook served by this process. The model is told the tool's
//! name, what it is for, which parameters it has to fill in, and the platform
//! sends the invocation to the tool's callback URL. Descriptors serialize in
//! the provider's `temporaryTool` wire format.

mod navigate_stage;
mod schedule_event;

pub use navigate_stage::{navigate_stage_tool, NAVIGATE_STAGE_PATH};
pub use schedule_event::{schedule_event_tool, SCHEDULE_EVENT_PATH};

use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Where the platform places a parameter in the callback request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterLocation {
    #[serde(rename = "PARAMETER_LOCATION_BODY")]
    Body,
    #[allow(dead_code)] // Callbacks here are all JSON bodies for now
    #[serde(rename = "PARAMETER_LOCATION_QUERY")]
    Query,
    #[allow(dead_code)]
    #[serde(rename = "PARAMETER_LOCATION_HEADER")]
    Header,
}

/// JSON-schema type tag for a dynamic parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    #[allow(dead_code)]
    Boolean,
}

/// Value the platform injects from call context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KnownValue {
    #[serde(rename = "KNOWN_PARAM_CALL_ID")]
    CallId,
}

/// HTTP method used for the callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
    #[allow(dead_code)]
    Get,
}

/// Schema the model sees for a dynamic parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

/// A parameter the model must supply at call time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub schema: ParameterSchema,
    pub required: bool,
}

impl DynamicParameter {
    /// Required body parameter
    pub fn required(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Body,
            schema: ParameterSchema {
                description: description.into(),
                param_type,
                allowed: None,
            },
            required: true,
        }
    }

    /// Optional body parameter
    #[allow(dead_code)]
    pub fn optional(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    /// Restrict the parameter to a fixed set of values
    #[must_use]
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    #[allow(dead_code)]
    pub fn at(mut self, location: ParameterLocation) -> Self {
        self.location = location;
        self
    }
}

/// A parameter injected by the platform, never requested from the model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub known_value: KnownValue,
}

impl AutomaticParameter {
    /// The call identifier, delivered in the request body
    pub fn call_id() -> Self {
        Self {
            name: "call_id".to_string(),
            location: ParameterLocation::Body,
            known_value: KnownValue::CallId,
        }
    }
}

/// Where the platform sends an invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCallback {
    pub base_url_pattern: String,
    pub http_method: HttpMethod,
}

/// A named, invocable capability exposed to the model.
///
/// Built through [`ToolBuilder`], immutable afterwards. Stages that offer the
/// same tool share one descriptor behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    #[serde(rename = "modelToolName")]
    name: String,
    description: String,
    dynamic_parameters: Vec<DynamicParameter>,
    automatic_parameters: Vec<AutomaticParameter>,
    http: HttpCallback,
}

impl ToolDescriptor {
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolBuilder {
        ToolBuilder {
            name: name.into(),
            description: description.into(),
            dynamic_parameters: Vec::new(),
            automatic_parameters: Vec::new(),
            callback: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(dead_code)]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dynamic_parameters(&self) -> &[DynamicParameter] {
        &self.dynamic_parameters
    }

    pub fn automatic_parameters(&self) -> &[AutomaticParameter] {
        &self.automatic_parameters
    }

    pub fn callback_url(&self) -> &str {
        &self.http.base_url_pattern
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http.http_method
    }
}

/// Wire wrapper the provider expects around each tool
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTool<'a> {
    pub temporary_tool: &'a ToolDescriptor,
}

impl<'a> From<&'a ToolDescriptor> for SelectedTool<'a> {
    fn from(tool: &'a ToolDescriptor) -> Self {
        Self {
            temporary_tool: tool,
        }
    }
}

/// Rejected tool definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolBuildError {
    #[error("tool name must not be empty")]
    EmptyName,
    #[error("tool parameter name must not be empty")]
    EmptyParameterName,
    #[error("required parameter '{parameter}' has no description")]
    MissingParameterDescription { parameter: String },
    #[error("parameter '{parameter}' is declared more than once")]
    DuplicateParameter { parameter: String },
    #[error("tool has no callback URL")]
    MissingCallback,
}

/// Step-by-step construction of a [`ToolDescriptor`]
#[derive(Debug, Clone)]
pub struct ToolBuilder {
    name: String,
    description: String,
    dynamic_parameters: Vec<DynamicParameter>,
    automatic_parameters: Vec<AutomaticParameter>,
    callback: Option<HttpCallback>,
}

impl ToolBuilder {
    #[must_use]
    pub fn dynamic(mut self, parameter: DynamicParameter) -> Self {
        self.dynamic_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn automatic(mut self, parameter: AutomaticParameter) -> Self {
        self.automatic_parameters.push(parameter);
        self
    }

    /// Point the tool at `path` under `base_url`
    #[must_use]
    pub fn callback(mut self, base_url: &str, path: &str, method: HttpMethod) -> Self {
        self.callback = Some(HttpCallback {
            base_url_pattern: join_url(base_url, path),
            http_method: method,
        });
        self
    }

    pub fn build(self) -> Result<ToolDescriptor, ToolBuildError> {
        if self.name.trim().is_empty() {
            return Err(ToolBuildError::EmptyName);
        }

        let mut seen = HashSet::new();
        let names = self
            .dynamic_parameters
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.automatic_parameters.iter().map(|p| p.name.as_str()));
        for name in names {
            if name.trim().is_empty() {
                return Err(ToolBuildError::EmptyParameterName);
            }
            if !seen.insert(name) {
                return Err(ToolBuildError::DuplicateParameter {
                    parameter: name.to_string(),
                });
            }
        }

        // The model relies on the description to decide how to fill a parameter
        if let Some(param) = self
            .dynamic_parameters
            .iter()
            .find(|p| p.required && p.schema.description.trim().is_empty())
        {
            return Err(ToolBuildError::MissingParameterDescription {
                parameter: param.name.clone(),
            });
        }

        let http = self.callback.ok_or(ToolBuildError::MissingCallback)?;

        Ok(ToolDescriptor {
            name: self.name,
            description: self.description,
            dynamic_parameters: self.dynamic_parameters,
            automatic_parameters: self.automatic_parameters,
            http,
        })
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
