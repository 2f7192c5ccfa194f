//! The seam between the clients and the network.
//!
//! A `Transport` performs one GET or POST and reports whatever the server
//! said. Non-2xx statuses come back as `Ok(HttpResponse)`; only a failure to
//! get any response at all is an `Err`. Status interpretation belongs to the
//! clients' `parse_*` methods.
//!
//! Futures returned here are lazy and cancel on drop. No timeout or retry is
//! layered on top of the underlying HTTP library's defaults.

use std::future::Future;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// An HTTP round-trip executor the clients are generic over.
pub trait Transport: Send + Sync {
    /// Issue a GET to `url` with `query` appended.
    fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;

    /// Issue a POST to `url` with a JSON `body`.
    fn post(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;

    /// Dispatch a built request to `get` or `post`.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        async move {
            match request.method {
                HttpMethod::Get => self.get(&request.url, &request.query).await,
                HttpMethod::Post => {
                    self.post(&request.url, request.body.unwrap_or_default())
                        .await
                }
            }
        }
    }
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use std::future::Future;

    use reqwest::header::CONTENT_TYPE;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{encode_query, HttpResponse};

    /// `Transport` backed by a shared `reqwest::Client`.
    ///
    /// Cloning is cheap; clones share the connection pool.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Transport for ReqwestTransport {
        fn get(
            &self,
            url: &str,
            query: &[(String, String)],
        ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
            let url = if query.is_empty() {
                url.to_string()
            } else {
                format!("{url}?{}", encode_query(query))
            };
            let request = self.client.get(url);
            async move { read_response(request.send().await).await }
        }

        fn post(
            &self,
            url: &str,
            body: String,
        ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
            let request = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body);
            async move { read_response(request.send().await).await }
        }
    }

    async fn read_response(
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<HttpResponse, ApiError> {
        let response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
