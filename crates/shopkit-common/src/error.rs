//! Errors

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the storefront API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine readable error code
    #[serde(default)]
    pub code: Option<u16>,
    /// Human readable description; bodies without one are wrapped whole by
    /// [`ErrorResponse::from_value`]
    #[serde(alias = "detail")]
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "code: {}, message: {}", code, self.message),
            None => write!(f, "message: {}", self.message),
        }
    }
}

impl ErrorResponse {
    /// Create new [`ErrorResponse`]
    pub fn new(code: Option<u16>, message: String) -> Self {
        Self { code, message }
    }

    /// Error response from json
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;

        Self::from_value(value)
    }

    /// Error response from json Value, wrapping bodies that are not in the
    /// expected shape
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match serde_json::from_value::<ErrorResponse>(value.clone()) {
            Ok(res) => Ok(res),
            Err(_) => Ok(Self {
                code: None,
                message: value.to_string(),
            }),
        }
    }
}
