use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;

use super::protocol::{CreateCategoryRequest, CreateProductRequest, UpdateProductRequest};
use super::types::{Category, CategorySummary, Product, ProductView};
use crate::db::router::ConnectionRouter;
use crate::error::StoreError;
use crate::store::tables::Tables;

fn product_view(tables: &Tables, product: Product) -> ProductView {
    let category = product.category_id.and_then(|id| {
        tables.categories.get(&id).map(|c| CategorySummary {
            id: c.id,
            name: c.name.clone(),
        })
    });
    ProductView { product, category }
}

// --- Products ---

pub async fn handle_create_product(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductView>), StoreError> {
    if req.name.trim().is_empty() {
        return Err(StoreError::InvalidRequest(
            "product name is required".to_string(),
        ));
    }
    if req.price.is_sign_negative() {
        return Err(StoreError::InvalidRequest(
            "product price must not be negative".to_string(),
        ));
    }
    if req.stock_quantity < 0 {
        return Err(StoreError::InvalidRequest(
            "stock quantity must not be negative".to_string(),
        ));
    }

    let db = router.active().await;
    let mut txn = db.begin().await?;

    if let Some(category_id) = req.category_id
        && !txn.categories.contains_key(&category_id)
    {
        return Err(StoreError::InvalidRequest(format!(
            "category with id {category_id} not found"
        )));
    }

    let mut product = Product {
        id: 0,
        name: req.name,
        description: req.description,
        price: req.price,
        stock_quantity: req.stock_quantity,
        category_id: req.category_id,
        image_url: req.image_url,
    };
    product.id = txn.insert_product(product.clone());

    let view = product_view(&txn, product);
    txn.commit();

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn handle_list_products(
    Extension(router): Extension<Arc<ConnectionRouter>>,
) -> Result<Json<Vec<ProductView>>, StoreError> {
    let db = router.active().await;
    let tables = db.read().await?;

    let products = tables
        .products
        .values()
        .cloned()
        .map(|product| product_view(&tables, product))
        .collect();

    Ok(Json(products))
}

pub async fn handle_get_product(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductView>, StoreError> {
    let db = router.active().await;
    let tables = db.read().await?;

    let product = tables
        .products
        .get(&product_id)
        .cloned()
        .ok_or(StoreError::NotFound {
            entity: "product",
            id: product_id,
        })?;

    Ok(Json(product_view(&tables, product)))
}

pub async fn handle_update_product(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Path(product_id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductView>, StoreError> {
    if let Some(price) = req.price
        && price.is_sign_negative()
    {
        return Err(StoreError::InvalidRequest(
            "product price must not be negative".to_string(),
        ));
    }
    if let Some(stock) = req.stock_quantity
        && stock < 0
    {
        return Err(StoreError::InvalidRequest(
            "stock quantity must not be negative".to_string(),
        ));
    }

    let db = router.active().await;
    let mut txn = db.begin().await?;

    if let Some(category_id) = req.category_id
        && !txn.categories.contains_key(&category_id)
    {
        return Err(StoreError::InvalidRequest(format!(
            "category with id {category_id} not found"
        )));
    }

    let product = txn
        .products
        .get_mut(&product_id)
        .ok_or(StoreError::NotFound {
            entity: "product",
            id: product_id,
        })?;

    if let Some(name) = req.name {
        product.name = name;
    }
    if let Some(description) = req.description {
        product.description = Some(description);
    }
    if let Some(price) = req.price {
        product.price = price;
    }
    if let Some(stock_quantity) = req.stock_quantity {
        product.stock_quantity = stock_quantity;
    }
    if let Some(category_id) = req.category_id {
        product.category_id = Some(category_id);
    }
    if let Some(image_url) = req.image_url {
        product.image_url = Some(image_url);
    }

    let updated = product.clone();
    let view = product_view(&txn, updated);
    txn.commit();

    Ok(Json(view))
}

pub async fn handle_delete_product(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, StoreError> {
    let db = router.active().await;
    let mut txn = db.begin().await?;

    txn.remove_product(product_id).ok_or(StoreError::NotFound {
        entity: "product",
        id: product_id,
    })?;

    txn.commit();
    Ok(StatusCode::NO_CONTENT)
}

// --- Categories ---

pub async fn handle_create_category(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), StoreError> {
    if req.name.trim().is_empty() {
        return Err(StoreError::InvalidRequest(
            "category name is required".to_string(),
        ));
    }

    let db = router.active().await;
    let mut txn = db.begin().await?;

    if txn.category_name_taken(&req.name) {
        return Err(StoreError::InvalidRequest(format!(
            "category '{}' already exists",
            req.name
        )));
    }

    let mut category = Category {
        id: 0,
        name: req.name,
        description: req.description,
    };
    category.id = txn.insert_category(category.clone());
    txn.commit();

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn handle_list_categories(
    Extension(router): Extension<Arc<ConnectionRouter>>,
) -> Result<Json<Vec<Category>>, StoreError> {
    let db = router.active().await;
    let tables = db.read().await?;
    Ok(Json(tables.categories.values().cloned().collect()))
}

pub async fn handle_get_category(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Path(category_id): Path<i64>,
) -> Result<Json<Category>, StoreError> {
    let db = router.active().await;
    let tables = db.read().await?;

    let category = tables
        .categories
        .get(&category_id)
        .cloned()
        .ok_or(StoreError::NotFound {
            entity: "category",
            id: category_id,
        })?;

    Ok(Json(category))
}

pub async fn handle_delete_category(
    Extension(router): Extension<Arc<ConnectionRouter>>,
    Path(category_id): Path<i64>,
) -> Result<StatusCode, StoreError> {
    let db = router.active().await;
    let mut txn = db.begin().await?;

    txn.remove_category(category_id)
        .ok_or(StoreError::NotFound {
            entity: "category",
            id: category_id,
        })?;

    txn.commit();
    Ok(StatusCode::NO_CONTENT)
}
