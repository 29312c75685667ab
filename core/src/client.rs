//! Stateless HTTP request builder and response parser for the product API.
//!
//! # Design
//! `ProductClient` holds only a `base_url` and carries no mutable state
//! between calls. Each CRUD operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Status codes are not translated: any non-2xx response
//! becomes `ApiError::Status` with the raw body.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, Product, ProductId, ProductInput, ProductPatch};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the product resource.
#[derive(Debug, Clone)]
pub struct ProductClient {
    base_url: String,
}

impl ProductClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a list request. An empty or whitespace-only search term is
    /// treated as no search.
    pub fn build_list_products(&self, search: Option<&str>) -> HttpRequest {
        let query = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| vec![("search".to_string(), term.to_string())])
            .unwrap_or_default();
        HttpRequest {
            method: HttpMethod::Get,
            url: self.collection_url(),
            query,
            headers: accept_json(),
            body: None,
        }
    }

    pub fn build_create_product(&self, input: &ProductInput) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.collection_url(),
            query: Vec::new(),
            headers: json_body(),
            body: Some(body),
        })
    }

    pub fn build_update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(patch).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.item_url(id),
            query: Vec::new(),
            headers: json_body(),
            body: Some(body),
        })
    }

    pub fn build_delete_product(&self, id: &ProductId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.item_url(id),
            query: Vec::new(),
            headers: accept_json(),
            body: None,
        }
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response)?;
        decode::<Envelope<Product>>(&response.body).map(|envelope| envelope.data)
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response)?;
        decode::<Envelope<Product>>(&response.body).map(|envelope| envelope.data)
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn collection_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn item_url(&self, id: &ProductId) -> String {
        format!("{}/products/{id}", self.base_url)
    }
}

fn accept_json() -> Vec<(String, String)> {
    vec![("accept".to_string(), JSON.to_string())]
}

fn json_body() -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), JSON.to_string()),
        ("content-type".to_string(), JSON.to_string()),
    ]
}

/// Pass non-2xx responses through untouched.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
