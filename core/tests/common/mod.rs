//! Shared helpers for the core integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use product_core::{
    ApiError, HttpRequest, HttpResponse, Product, ProductClient, ProductInput, ProductService,
    Transport,
};

pub const BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

/// Replays queued responses in order and records every request it sees.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Err(ApiError::Transport(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                panic!("no scripted response for {} {}", request.method, request.url)
            })
    }
}

/// True when `product` carries exactly the field values of `input`.
pub fn same_fields(input: &ProductInput, product: &Product) -> bool {
    input.name == product.name
        && input.description == product.description
        && input.price == product.price
        && input.category == product.category
}

pub fn service() -> ProductService<ScriptedTransport> {
    ProductService::new(ProductClient::new(BASE_URL), ScriptedTransport::new())
}

pub const MOUSE_LIST: &str = r#"[{"id":"1","name":"Mouse","description":"Wireless mouse","price":99.9,"category":"Peripherals"}]"#;

pub const KEYBOARD_CREATED: &str = r#"{"data":{"id":"2","name":"Keyboard","description":"Mechanical keyboard","price":150,"category":"Peripherals"}}"#;

pub const TWO_PRODUCTS: &str = r#"[{"id":"1","name":"Mouse","description":"Wireless mouse","price":99.9,"category":"Peripherals"},{"id":"2","name":"Keyboard","description":"Mechanical keyboard","price":150,"category":"Peripherals"}]"#;
