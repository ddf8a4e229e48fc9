//! Request and response plumbing shared by every DM API operation

use crate::Result;
use reqwest::{Method, StatusCode, multipart::Form};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

/// A single DM API request, relative to the configured base URL
#[derive(Debug)]
pub(crate) struct ApiRequest<'a> {
    pub(crate) method: Method,
    pub(crate) endpoint: String,
    /// Message used when the request fails
    pub(crate) context: String,
    pub(crate) access_token: Option<&'a str>,
    pub(crate) expected: Vec<StatusCode>,
    pub(crate) query: Vec<(&'static str, String)>,
    pub(crate) form: Vec<(&'static str, String)>,
    pub(crate) multipart: Option<Form>,
    pub(crate) timeout: Option<Duration>,
}

impl<'a> ApiRequest<'a> {
    /// Create a request expecting a `200 OK` response
    pub(crate) fn new(
        method: Method,
        endpoint: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            context: context.into(),
            access_token: None,
            expected: vec![StatusCode::OK],
            query: Vec::new(),
            form: Vec::new(),
            multipart: None,
            timeout: None,
        }
    }

    pub(crate) fn get(endpoint: impl Into<String>, context: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint, context)
    }

    pub(crate) fn post(endpoint: impl Into<String>, context: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint, context)
    }

    pub(crate) fn put(endpoint: impl Into<String>, context: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint, context)
    }

    pub(crate) fn patch(endpoint: impl Into<String>, context: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint, context)
    }

    pub(crate) fn delete(endpoint: impl Into<String>, context: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint, context)
    }

    /// Authenticate with a bearer access token
    pub(crate) fn bearer(mut self, access_token: &'a str) -> Self {
        self.access_token = Some(access_token);
        self
    }

    /// Replace the set of acceptable response codes
    pub(crate) fn expect(mut self, codes: &[StatusCode]) -> Self {
        self.expected = codes.to_vec();
        self
    }

    /// Add a query parameter
    pub(crate) fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Add a form-encoded body field
    pub(crate) fn form(mut self, name: &'static str, value: impl ToString) -> Self {
        self.form.push((name, value.to_string()));
        self
    }

    /// Add several form-encoded body fields
    pub(crate) fn form_fields(mut self, fields: Vec<(&'static str, String)>) -> Self {
        self.form.extend(fields);
        self
    }

    /// Send a multipart body
    pub(crate) fn multipart(mut self, form: Form) -> Self {
        self.multipart = Some(form);
        self
    }

    /// Override the client's default timeout
    pub(crate) fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A successful DM API response
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Vec<u8>,
}

impl ApiResponse {
    /// The body as JSON, or an empty object if it is empty or not JSON
    pub(crate) fn json_or_empty(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|_| empty_object())
    }

    /// Deserialize the body
    pub(crate) fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// `{}`
pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}
