//! Sending requests and decoding responses.

use crate::envelope;
use crate::error::{ClientError, Result};
use crate::request::{ApiCall, CallOptions};
use crate::session::Session;
use crate::types::{ApiResponse, Body, Query, ReturnType};
use reqwest::Response;
use serde_json::Value;

/// HTTP statuses that are not errors by themselves.
pub const ACCEPTED_STATUSES: [u16; 5] = [200, 201, 202, 204, 302];

impl Session {
    /// Sends one API call and decodes the response.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Connect`] if the request could not be sent.
    /// - [`ClientError::Status`] if the HTTP status is not one of
    ///   [`ACCEPTED_STATUSES`], whatever the body says.
    /// - [`ClientError::General`] or [`ClientError::Api`] if a parsed body
    ///   carries an error envelope.
    pub async fn call_api(&self, call: ApiCall, options: &CallOptions) -> Result<ApiResponse> {
        let prepared = self.create_api_message(&call, options)?;

        tracing::debug!(curl = %prepared.to_curl(), "Sending API request");

        let request = self
            .http
            .request(prepared.method.clone(), &prepared.url)
            .headers(prepared.headers.clone())
            .query(&prepared.query)
            .body(prepared.body.clone())
            .timeout(prepared.timeout);

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Connect {
                host: prepared.host.clone(),
                port: prepared.port,
                protocol: prepared.protocol(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %prepared.url, "API response received");

        if !ACCEPTED_STATUSES.contains(&status.as_u16()) {
            return Err(ClientError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        if options.return_header {
            return Ok(ApiResponse::Headers(header_map(&response)));
        }

        let bytes = response.bytes().await?;

        match options.return_type {
            ReturnType::Raw => Ok(ApiResponse::Raw(bytes)),
            ReturnType::Json => Ok(ApiResponse::Json(String::from_utf8(bytes.to_vec())?)),
            ReturnType::Parsed => {
                let body: Body = if bytes.iter().all(u8::is_ascii_whitespace) {
                    Body::new()
                } else {
                    serde_json::from_slice(&bytes)?
                };
                let body = envelope::normalize(body, options.apply_async_status_override)?;
                Ok(ApiResponse::Parsed(body))
            }
        }
    }

    /// `GET path` with optional query parameters.
    pub async fn get_api(&self, path: &str, query: Query, options: &CallOptions) -> Result<ApiResponse> {
        self.call_api(ApiCall::get(path).query(query), options).await
    }

    /// `POST path` with a JSON body.
    pub async fn post_api(&self, path: &str, body: Body, options: &CallOptions) -> Result<ApiResponse> {
        self.call_api(ApiCall::post(path).body(body), options).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put_api(&self, path: &str, body: Body, options: &CallOptions) -> Result<ApiResponse> {
        self.call_api(ApiCall::put(path).body(body), options).await
    }

    /// `DELETE path` with optional query parameters.
    pub async fn delete_api(&self, path: &str, query: Query, options: &CallOptions) -> Result<ApiResponse> {
        self.call_api(ApiCall::delete(path).query(query), options).await
    }

    /// `HEAD path`. Usually combined with
    /// [`CallOptions::with_return_header`].
    pub async fn head_api(&self, path: &str, options: &CallOptions) -> Result<ApiResponse> {
        self.call_api(ApiCall::head(path), options).await
    }
}

fn header_map(response: &Response) -> Body {
    let mut map = Body::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match map.get_mut(name.as_str()) {
            Some(Value::String(existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            _ => {
                map.insert(name.as_str().to_string(), Value::String(value));
            }
        }
    }
    map.insert("status".to_string(), Value::from("success"));
    map
}
