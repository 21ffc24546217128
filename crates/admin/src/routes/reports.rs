//! Sales history and analytics pages.

use std::collections::BTreeMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::Money;

use crate::components::{Chrome, DataTableConfig, Page, sales_table_config};
use crate::filters;
use crate::models::TransactionKind;
use crate::routes::dashboard::{Bar, TransactionRow, percent_of, trend_bars};
use crate::services::DashboardStats;
use crate::state::AppState;

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(sales_page))
        .route("/analytics", get(analytics_page))
}

/// Query parameters for the sales page.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub q: Option<String>,
}

/// Sales page template.
#[derive(Template, WebTemplate)]
#[template(path = "sales.html")]
pub struct SalesTemplate {
    pub chrome: Chrome,
    pub table: DataTableConfig,
    pub rows: Vec<TransactionRow>,
    pub query: String,
    pub total: String,
    pub units: u32,
}

/// Sale transactions, newest first.
///
/// GET /sales
#[instrument(skip(page, state))]
async fn sales_page(
    page: Page,
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> SalesTemplate {
    let query = query.q.unwrap_or_default();
    let needle = query.trim().to_lowercase();

    let mut sales: Vec<_> = state
        .store()
        .transactions()
        .iter()
        .filter(|t| t.kind == TransactionKind::Sale)
        .filter(|t| needle.is_empty() || t.product_name.to_lowercase().contains(&needle))
        .collect();
    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    SalesTemplate {
        chrome: page.chrome,
        table: sales_table_config(),
        total: sales.iter().map(|t| t.total_amount).sum::<Money>().to_string(),
        units: sales.iter().map(|t| t.quantity).sum(),
        rows: sales.into_iter().map(TransactionRow::from).collect(),
        query,
    }
}

/// Per-product stock level against its minimum.
#[derive(Debug, Clone)]
pub struct StockLevel {
    pub name: String,
    pub stock: u32,
    pub min_stock: u32,
    pub percent: u32,
    pub low: bool,
}

/// Analytics page template.
#[derive(Template, WebTemplate)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
    pub chrome: Chrome,
    pub trend: Vec<Bar>,
    pub stock_levels: Vec<StockLevel>,
    pub top_sellers: Vec<Bar>,
    pub inventory_value: String,
}

/// Stock levels, sales trend and best sellers.
///
/// GET /analytics
#[instrument(skip(page, state))]
async fn analytics_page(page: Page, State(state): State<AppState>) -> AnalyticsTemplate {
    let now = state.clock().now();
    let transactions = state.store().transactions();
    let products = state.store().products.read().await;
    let stats = DashboardStats::compute(products.list(), transactions, now);

    let max_stock = products.list().iter().map(|p| p.stock).max().unwrap_or(0);
    let stock_levels = products
        .list()
        .iter()
        .map(|p| StockLevel {
            name: p.name.clone(),
            stock: p.stock,
            min_stock: p.min_stock,
            percent: if max_stock == 0 {
                0
            } else {
                p.stock.saturating_mul(100) / max_stock
            },
            low: p.is_low_stock(),
        })
        .collect();

    let mut revenue: BTreeMap<&str, Money> = BTreeMap::new();
    for sale in transactions.iter().filter(|t| t.kind == TransactionKind::Sale) {
        let entry = revenue.entry(sale.product_name.as_str()).or_insert(Money::ZERO);
        *entry = *entry + sale.total_amount;
    }
    let mut ranked: Vec<(&str, Money)> = revenue.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let peak = ranked.first().map_or(Money::ZERO, |(_, total)| *total);

    AnalyticsTemplate {
        chrome: page.chrome,
        trend: trend_bars(&stats),
        stock_levels,
        top_sellers: ranked
            .into_iter()
            .map(|(name, total)| Bar {
                label: name.to_string(),
                value: total.to_string(),
                percent: percent_of(total, peak),
            })
            .collect(),
        inventory_value: products
            .list()
            .iter()
            .map(|p| p.stock_value())
            .sum::<Money>()
            .to_string(),
    }
}
