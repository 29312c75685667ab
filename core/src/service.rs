//! One round trip per CRUD verb.
//!
//! `ProductService` pairs a `ProductClient` with a `Transport`. Each call
//! builds, executes and parses exactly once: no retry, no caching, and
//! failures are returned as the client or transport produced them.

use crate::client::ProductClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Product, ProductId, ProductInput, ProductPatch};

#[derive(Debug, Clone)]
pub struct ProductService<T> {
    client: ProductClient,
    transport: T,
}

impl ProductService<HttpTransport> {
    /// Service over real HTTP, configured entirely from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ProductClient::new(&config.base_url), HttpTransport::new(config))
    }
}

impl<T: Transport> ProductService<T> {
    pub fn new(client: ProductClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ProductClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list(&self, search: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let response = self.execute(&self.client.build_list_products(search))?;
        self.client.parse_list_products(response)
    }

    pub fn create(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let response = self.execute(&self.client.build_create_product(input)?)?;
        self.client.parse_create_product(response)
    }

    pub fn update(&self, id: &ProductId, patch: &ProductPatch) -> Result<Product, ApiError> {
        let response = self.execute(&self.client.build_update_product(id, patch)?)?;
        self.client.parse_update_product(response)
    }

    pub fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let response = self.execute(&self.client.build_delete_product(id))?;
        self.client.parse_delete_product(response)
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request)
    }
}
