use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
}

#[derive(Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub category: String,
}

#[derive(Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

pub type Db = Arc<RwLock<Vec<Product>>>;

/// Failures rendered the way the real API renders them.
pub enum ApiFailure {
    NotFound,
    Invalid(BTreeMap<&'static str, Vec<String>>),
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            ApiFailure::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Product not found" })),
            )
                .into_response(),
            ApiFailure::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": "The given data was invalid.", "errors": errors })),
            )
                .into_response(),
        }
    }
}

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router preloaded with `products`, in list order.
pub fn app_with(products: Vec<Product>) -> Router {
    let db: Db = Arc::new(RwLock::new(products));
    let products = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product));
    Router::new().nest("/api/v1", products).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Product>> {
    let products = db.read().await;
    let needle = params
        .search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let listed = match needle {
        Some(needle) => products
            .iter()
            .filter(|p| {
                [&p.name, &p.description, &p.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect(),
        None => products.clone(),
    };
    Json(listed)
}

async fn create_product(
    State(db): State<Db>,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Envelope<Product>>), ApiFailure> {
    let mut errors = BTreeMap::new();
    check_text(&mut errors, "name", &input.name, 3, 50);
    check_text(&mut errors, "description", &input.description, 10, 500);
    check_price(&mut errors, input.price);
    check_text(&mut errors, "category", &input.category, 1, 30);
    if !errors.is_empty() {
        return Err(ApiFailure::Invalid(errors));
    }

    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
        price: input.price,
        category: input.category,
    };
    debug!(id = %product.id, "created product");
    db.write().await.push(product.clone());
    Ok((StatusCode::CREATED, Json(Envelope { data: product })))
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProduct>,
) -> Result<Json<Envelope<Product>>, ApiFailure> {
    let mut errors = BTreeMap::new();
    if let Some(name) = &input.name {
        check_text(&mut errors, "name", name, 3, 50);
    }
    if let Some(description) = &input.description {
        check_text(&mut errors, "description", description, 10, 500);
    }
    if let Some(price) = input.price {
        check_price(&mut errors, price);
    }
    if let Some(category) = &input.category {
        check_text(&mut errors, "category", category, 1, 30);
    }

    let mut products = db.write().await;
    let product = products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(ApiFailure::NotFound)?;
    if !errors.is_empty() {
        return Err(ApiFailure::Invalid(errors));
    }
    if let Some(name) = input.name {
        product.name = name;
    }
    if let Some(description) = input.description {
        product.description = description;
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(category) = input.category {
        product.category = category;
    }
    Ok(Json(Envelope {
        data: product.clone(),
    }))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let mut products = db.write().await;
    let index = products
        .iter()
        .position(|p| p.id == id)
        .ok_or(ApiFailure::NotFound)?;
    products.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

fn check_text(
    errors: &mut BTreeMap<&'static str, Vec<String>>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors
            .entry(field)
            .or_default()
            .push(format!("The {field} must be between {min} and {max} characters."));
    }
}

fn check_price(errors: &mut BTreeMap<&'static str, Vec<String>>, price: Decimal) {
    if price <= Decimal::ZERO {
        errors
            .entry("price")
            .or_default()
            .push("The price must be greater than 0.".to_string());
    }
}
