//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use rust_decimal::prelude::ToPrimitive;
use tracing::instrument;

use stockroom_core::Money;

use crate::components::{Chrome, Page};
use crate::filters;
use crate::models::{Transaction, TransactionKind};
use crate::services::DashboardStats;
use crate::services::dashboard::DailySales;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Headline figure card.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub tone: &'static str,
}

/// Transaction row for tables.
#[derive(Debug, Clone)]
pub struct TransactionRow {
    pub date: String,
    pub product: String,
    pub kind: &'static str,
    pub kind_class: &'static str,
    pub quantity: u32,
    pub unit_price: String,
    pub total: String,
    pub user: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            date: t.created_at.format("%b %-d, %Y").to_string(),
            product: t.product_name.clone(),
            kind: t.kind.label(),
            kind_class: match t.kind {
                TransactionKind::Sale => "badge-sale",
                TransactionKind::Purchase => "badge-purchase",
                TransactionKind::Adjustment => "badge-adjustment",
            },
            quantity: t.quantity,
            unit_price: t.unit_price.to_string(),
            total: t.total_amount.to_string(),
            user: t.user_name.clone(),
        }
    }
}

/// One bar of a bar chart, scaled to the largest value.
#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: String,
    pub percent: u32,
}

/// Percentage of `value` relative to `peak`, for bar widths.
#[must_use]
pub fn percent_of(value: Money, peak: Money) -> u32 {
    if peak <= Money::ZERO {
        return 0;
    }
    (value.amount() * rust_decimal::Decimal::ONE_HUNDRED / peak.amount())
        .round()
        .to_u32()
        .unwrap_or(0)
}

/// Daily sales bars, oldest first.
#[must_use]
pub fn trend_bars(stats: &DashboardStats) -> Vec<Bar> {
    let peak = stats.peak_daily_sales();
    stats
        .sales_trend
        .iter()
        .map(|DailySales { day, total, .. }| Bar {
            label: day.format("%a").to_string(),
            value: total.to_string(),
            percent: percent_of(*total, peak),
        })
        .collect()
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub chrome: Chrome,
    pub cards: Vec<StatCard>,
    pub trend: Vec<Bar>,
    pub categories: Vec<Bar>,
    pub recent: Vec<TransactionRow>,
}

/// Dashboard page.
///
/// GET /dashboard
#[instrument(skip(page, state))]
async fn dashboard(page: Page, State(state): State<AppState>) -> DashboardTemplate {
    let now = state.clock().now();
    let stats = {
        let products = state.store().products.read().await;
        DashboardStats::compute(products.list(), state.store().transactions(), now)
    };

    let peak_value = stats
        .stock_by_category
        .iter()
        .map(|c| c.value)
        .max()
        .unwrap_or(Money::ZERO);

    DashboardTemplate {
        chrome: page.chrome,
        cards: vec![
            StatCard {
                title: "Total Products",
                value: stats.total_products.to_string(),
                tone: "blue",
            },
            StatCard {
                title: "Low Stock Items",
                value: stats.low_stock_products.to_string(),
                tone: "red",
            },
            StatCard {
                title: "Total Sales",
                value: stats.total_sales.to_string(),
                tone: "green",
            },
            StatCard {
                title: "Total Purchases",
                value: stats.total_purchases.to_string(),
                tone: "purple",
            },
        ],
        trend: trend_bars(&stats),
        categories: stats
            .stock_by_category
            .iter()
            .map(|c| Bar {
                label: c.category.clone(),
                value: format!("{} units, {}", c.units, c.value),
                percent: percent_of(c.value, peak_value),
            })
            .collect(),
        recent: stats.recent_transactions.iter().map(TransactionRow::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(Money::from_cents(5000), Money::from_cents(10000)), 50);
        assert_eq!(percent_of(Money::from_cents(10000), Money::from_cents(10000)), 100);
        assert_eq!(percent_of(Money::ZERO, Money::ZERO), 0);
    }
}
