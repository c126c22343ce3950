use rust_decimal::Decimal;
use serde::Serialize;

/// A product category. Deleting a category does not delete its products;
/// their `category_id` is set to `None` instead.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A sellable product.
///
/// `stock_quantity` is never negative: the only writers are the order
/// placement transaction (decrement) and the cancellation path (restore),
/// and both run inside a store transaction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i64,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Compact category reference embedded in product views.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
}

/// Product row joined with its resolved category, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<CategorySummary>,
}
