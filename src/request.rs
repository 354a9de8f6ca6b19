//! The inbound request surface.
//!
//! The engine reads exactly two things from a request: its absolute URL and
//! its HTTP method. Interception layers adapt their own request types by
//! implementing [`Request`].

/// Minimal view of an inbound request.
pub trait Request: Send + Sync {
    /// The absolute URL of the request (path and query are derived from it).
    fn url(&self) -> &str;

    /// The HTTP method string (e.g. `GET`). Compared case-insensitively.
    fn method(&self) -> &str;
}

/// A plain value-type request, convenient for tests and simple adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    url: String,
    method: String,
}

impl RequestParts {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }
}

impl Request for RequestParts {
    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> &str {
        &self.method
    }
}
