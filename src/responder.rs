//! The responder surface.
//!
//! A responder is the opaque object handed back to the interception layer
//! once a rule has matched. The engine never inspects one; it only obtains
//! it from a rule's generator and passes it onward. [`StaticResponder`] is a
//! ready-made implementation for canned responses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Capability produced by a responder generator.
///
/// Implementations carry whatever the interception layer needs to stream a
/// simulated response (status, headers, body, timing). This engine treats
/// them as opaque.
pub trait Responder: Send + Sync {}

/// Error raised when validating a [`StaticResponder`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponderError {
    /// HTTP status code outside 100..=599.
    #[error("invalid status code: {0}")]
    InvalidStatus(u16),
}

/// Body of a canned response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StubBody {
    /// Plain text body
    Text { content: String },
    /// JSON body
    Json { content: serde_json::Value },
    /// Raw binary body
    Bytes { content: Vec<u8> },
}

impl StubBody {
    /// Get the body content as bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            StubBody::Text { content } => Ok(content.as_bytes().to_vec()),
            StubBody::Json { content } => Ok(serde_json::to_vec(content)?),
            StubBody::Bytes { content } => Ok(content.clone()),
        }
    }

    /// Get the content type for this body.
    pub fn content_type(&self) -> &'static str {
        match self {
            StubBody::Text { .. } => "text/plain",
            StubBody::Json { .. } => "application/json",
            StubBody::Bytes { .. } => "application/octet-stream",
        }
    }
}

/// A fixed, data-described mock response.
///
/// Interception layers can deserialize these from configuration or build
/// them programmatically with the `with_*` methods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaticResponder {
    /// HTTP status code
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: Option<StubBody>,
}

fn default_status() -> u16 {
    200
}

impl StaticResponder {
    /// Create a responder with the given status and no headers or body.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a 200 responder.
    pub fn ok() -> Self {
        Self::with_status(200)
    }

    /// Add a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a plain text body.
    pub fn with_body_text(mut self, content: impl Into<String>) -> Self {
        self.body = Some(StubBody::Text {
            content: content.into(),
        });
        self
    }

    /// Set a JSON body.
    pub fn with_body_json(mut self, content: serde_json::Value) -> Self {
        self.body = Some(StubBody::Json { content });
        self
    }

    /// Validate the responder definition.
    pub fn validate(&self) -> Result<(), ResponderError> {
        if self.status < 100 || self.status > 599 {
            return Err(ResponderError::InvalidStatus(self.status));
        }
        Ok(())
    }

    /// The effective content type: an explicit `Content-Type` header wins,
    /// otherwise the body's natural type.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .or_else(|| self.headers.get("Content-Type"))
            .map(String::as_str)
            .or_else(|| self.body.as_ref().map(|b| b.content_type()))
    }
}

impl Responder for StaticResponder {}
