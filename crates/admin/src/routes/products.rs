//! Product catalog pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::ProductId;

use crate::components::{Chrome, DataTableConfig, Page, products_table_config};
use crate::error::AppError;
use crate::filters;
use crate::models::{FieldError, Product, ProductForm};
use crate::state::AppState;
use crate::store::StoreError;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products_page).post(create_product))
        .route("/products/{id}", post(update_product))
        .route("/products/{id}/delete", post(delete_product))
}

/// Product row for the table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub category: String,
    pub stock: u32,
    pub min_stock: u32,
    pub price: String,
    pub supplier: String,
    pub low_stock: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            stock: product.stock,
            min_stock: product.min_stock,
            price: product.price.to_string(),
            supplier: product.supplier.clone(),
            low_stock: product.is_low_stock(),
        }
    }
}

/// The add/edit form as rendered.
#[derive(Debug, Clone)]
pub struct ProductFormView {
    pub action: String,
    pub title: &'static str,
    pub submit: &'static str,
    pub open: bool,
    pub values: ProductForm,
    pub errors: Vec<FieldError>,
}

impl ProductFormView {
    fn blank() -> Self {
        Self {
            action: "/products".to_string(),
            title: "Add New Product",
            submit: "Add Product",
            open: false,
            values: ProductForm::default(),
            errors: Vec::new(),
        }
    }

    fn editing(product: &Product) -> Self {
        Self {
            action: format!("/products/{}", product.id),
            title: "Edit Product",
            submit: "Update Product",
            open: true,
            values: ProductForm {
                name: product.name.clone(),
                description: product.description.clone(),
                sku: product.sku.clone(),
                category: product.category.clone(),
                price: product.price.amount().to_string(),
                cost: product.cost.amount().to_string(),
                stock: product.stock.to_string(),
                min_stock: product.min_stock.to_string(),
                supplier: product.supplier.clone(),
            },
            errors: Vec::new(),
        }
    }

    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

/// Products page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub chrome: Chrome,
    pub table: DataTableConfig,
    pub rows: Vec<ProductRow>,
    pub query: String,
    pub low_stock: Vec<String>,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
    pub form: ProductFormView,
}

/// Query parameters for the products page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
    pub edit: Option<i32>,
    pub notice: Option<String>,
}

fn notice_text(code: &str) -> Option<&'static str> {
    match code {
        "created" => Some("Product created successfully"),
        "updated" => Some("Product updated successfully"),
        "deleted" => Some("Product deleted successfully"),
        _ => None,
    }
}

async fn render(
    state: &AppState,
    chrome: Chrome,
    query: String,
    notice: Option<&'static str>,
    error: Option<String>,
    form: ProductFormView,
) -> ProductsTemplate {
    let products = state.store().products.read().await;
    ProductsTemplate {
        chrome,
        table: products_table_config(),
        rows: products.search(&query).into_iter().map(ProductRow::from).collect(),
        query,
        low_stock: products.low_stock().iter().map(|p| p.name.clone()).collect(),
        notice,
        error,
        form,
    }
}

/// Product list with search, low-stock alert and the add/edit form.
///
/// GET /products
#[instrument(skip(page, state))]
async fn products_page(
    page: Page,
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<ProductsTemplate, AppError> {
    let form = match query.edit {
        Some(id) => {
            let products = state.store().products.read().await;
            ProductFormView::editing(products.get(ProductId::new(id))?)
        }
        None => ProductFormView::blank(),
    };
    Ok(render(
        &state,
        page.chrome,
        query.q.unwrap_or_default(),
        query.notice.as_deref().and_then(notice_text),
        None,
        form,
    )
    .await)
}

/// Re-render the page with the submitted form and its errors.
async fn rejected(
    state: &AppState,
    chrome: Chrome,
    mut form: ProductFormView,
    values: ProductForm,
    errors: Vec<FieldError>,
    error: Option<String>,
) -> Response {
    form.open = true;
    form.values = values;
    form.errors = errors;
    let page = render(state, chrome, String::new(), None, error, form).await;
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

/// Create a product.
///
/// POST /products
#[instrument(skip(page, state, form), fields(sku = %form.sku))]
async fn create_product(
    page: Page,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Response {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            return rejected(&state, page.chrome, ProductFormView::blank(), form, errors, None)
                .await;
        }
    };

    let now = state.clock().now();
    let created = state.store().products.write().await.create(draft, now);
    match created {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            Redirect::to("/products?notice=created").into_response()
        }
        Err(StoreError::Conflict(message)) => {
            rejected(
                &state,
                page.chrome,
                ProductFormView::blank(),
                form,
                Vec::new(),
                Some(message),
            )
            .await
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Update a product.
///
/// POST /products/{id}
#[instrument(skip(page, state, form))]
async fn update_product(
    page: Page,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Response {
    let id = ProductId::new(id);
    let existing = match state.store().products.read().await.get(id) {
        Ok(product) => ProductFormView::editing(product),
        Err(e) => return AppError::from(e).into_response(),
    };
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return rejected(&state, page.chrome, existing, form, errors, None).await,
    };

    let now = state.clock().now();
    let updated = state.store().products.write().await.update(id, draft, now);
    match updated {
        Ok(_) => {
            tracing::info!(product_id = %id, "Product updated");
            Redirect::to("/products?notice=updated").into_response()
        }
        Err(StoreError::Conflict(message)) => {
            rejected(&state, page.chrome, existing, form, Vec::new(), Some(message)).await
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Delete a product.
///
/// POST /products/{id}/delete
#[instrument(skip(_page, state))]
async fn delete_product(
    _page: Page,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let removed = state
        .store()
        .products
        .write()
        .await
        .delete(ProductId::new(id))?;
    tracing::info!(product_id = %removed.id, sku = %removed.sku, "Product deleted");
    Ok(Redirect::to("/products?notice=deleted"))
}
