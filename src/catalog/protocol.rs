use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i64,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Body of `PUT /api/products/:id`. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i64>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Body of `POST /api/categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}
