// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types

use bytes::Bytes;
use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request body
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            body: None,
        })
    }

    /// Create a request from a method name as scripts pass it (`"post"`, `"GET"`)
    pub fn from_method_name(method: &str, url: impl AsRef<str>) -> Result<Self> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::network(format!("invalid HTTP method '{}'", method)))?;
        Self::new(method, url)
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}
