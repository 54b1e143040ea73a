//! Gateway wire types (JSON over REST).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Response envelope wrapping every gateway payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

impl<T> GatewayResponse<T> {
    /// Returns the payload if the envelope is successful and carries data.
    ///
    /// An unsuccessful envelope yields the gateway's error; one with neither
    /// data nor error yields [`ErrorDetails::empty_response`].
    pub fn into_data(self) -> Result<T, ErrorDetails> {
        let Self {
            success,
            data,
            error,
        } = self;
        match (success, data) {
            (true, Some(data)) => Ok(data),
            _ => Err(error.unwrap_or_else(ErrorDetails::empty_response)),
        }
    }
}

/// Error reported by the gateway inside an envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorDetails {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            details: None,
        }
    }

    /// Stand-in for an envelope that carried nothing at all.
    pub fn empty_response() -> Self {
        Self {
            code: None,
            message: "Empty response".to_string(),
            details: None,
        }
    }

    /// Whether the gateway flagged this as a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| code.to_ascii_uppercase().contains("NOT_FOUND"))
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Tool descriptor advertised by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<ToolParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<ToolReturn>,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            returns: None,
        }
    }

    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// A single typed input of a [`Tool`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub param_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
}

impl ToolParameter {
    pub fn new(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Declared result shape of a [`Tool`]. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolReturn {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub return_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Body of `POST /execute`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest<'a> {
    pub tool_name: &'a str,
    pub parameters: &'a Map<String, Value>,
}

// Gateways written against nullable models send `null` for empty fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
