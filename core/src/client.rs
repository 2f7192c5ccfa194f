//! Stateless clients for the item catalog and form submission endpoints.
//!
//! # Design
//! `ResourceClient` holds a `base_url` and a transport and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the async `list` / `create` glue the two halves around
//! a single transport round trip.
//!
//! Items and forms differ only in their endpoint paths and record types, so
//! both clients are the same generic type parameterized by a `Resource`
//! descriptor.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{CreatedId, Form, Item, NameFilter, NewForm, NewItem};

/// Describes one family of records served by the API.
pub trait Resource {
    type Record: DeserializeOwned + Send;
    type Draft: Serialize + Sync;

    /// Used in log lines.
    const LABEL: &'static str;
    const LIST_PATH: &'static str;
    const CREATE_PATH: &'static str;
}

/// Inventory items: `items/get`, `items/add`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Items;

impl Resource for Items {
    type Record = Item;
    type Draft = NewItem;

    const LABEL: &'static str = "items";
    const LIST_PATH: &'static str = "items/get";
    const CREATE_PATH: &'static str = "items/add";
}

/// Intake forms: `forms/get`, `form/add`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forms;

impl Resource for Forms {
    type Record = Form;
    type Draft = NewForm;

    const LABEL: &'static str = "forms";
    const LIST_PATH: &'static str = "forms/get";
    // The server registers the singular path for creation.
    const CREATE_PATH: &'static str = "form/add";
}

/// Client for the inventory item catalog.
pub type ItemClient<T> = ResourceClient<Items, T>;

/// Client for intake form submissions.
pub type FormClient<T> = ResourceClient<Forms, T>;

#[derive(Debug, Clone)]
pub struct ResourceClient<R, T> {
    base_url: String,
    transport: T,
    resource: PhantomData<fn() -> R>,
}

impl<R: Resource, T> ResourceClient<R, T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            resource: PhantomData,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list(&self, filter: &NameFilter) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/{}", self.base_url, R::LIST_PATH),
            query: filter.query_params(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create(&self, draft: &R::Draft) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(draft).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/{}", self.base_url, R::CREATE_PATH),
            query: Vec::new(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<R::Record>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Extract the server-generated identifier from a create response.
    pub fn parse_create(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        let created: CreatedId = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Ok(created.id)
    }

    /// Client-side filtering hook. Records are currently returned as-is, in
    /// order; all narrowing happens server-side through `NameFilter`.
    pub fn filter_local(&self, records: Vec<R::Record>) -> Vec<R::Record> {
        records
    }
}

impl<R: Resource, T: Transport> ResourceClient<R, T> {
    /// Fetch the records matching `filter`. Resolves once.
    pub async fn list(&self, filter: &NameFilter) -> Result<Vec<R::Record>, ApiError> {
        let request = self.build_list(filter);
        log::debug!("{} list: GET {}", R::LABEL, request.url_with_query());
        let response = self.transport.execute(request).await?;
        let records = self.parse_list(response)?;
        log::debug!("{} list: {} record(s)", R::LABEL, records.len());
        Ok(records)
    }

    /// Persist a new record and return the identifier the server assigned.
    ///
    /// No idempotency key is sent: retrying after a lost response can
    /// create a duplicate.
    pub async fn create(&self, draft: &R::Draft) -> Result<String, ApiError> {
        let request = self.build_create(draft)?;
        log::debug!("{} create: POST {}", R::LABEL, request.url);
        let response = self.transport.execute(request).await?;
        let id = self.parse_create(response)?;
        log::debug!("{} create: assigned id {id}", R::LABEL);
        Ok(id)
    }
}

/// Both PocketShelf clients sharing one transport and base URL.
#[derive(Debug, Clone)]
pub struct PocketShelf<T> {
    pub items: ItemClient<T>,
    pub forms: FormClient<T>,
}

impl<T: Clone> PocketShelf<T> {
    pub fn new(config: &ApiConfig, transport: T) -> Self {
        Self {
            items: ItemClient::new(config.base_url(), transport.clone()),
            forms: FormClient::new(config.base_url(), transport),
        }
    }
}

/// Map any non-2xx response to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
