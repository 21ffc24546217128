//! Figures shown on the dashboard and analytics pages.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use stockroom_core::Money;

use crate::models::{Product, Transaction, TransactionKind};

/// Units and value on hand for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStock {
    pub category: String,
    pub units: u32,
    pub value: Money,
}

/// Sales for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySales {
    pub day: NaiveDate,
    pub total: Money,
    pub units: u32,
}

/// Aggregates over the catalog and transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_products: usize,
    pub low_stock_products: usize,
    pub total_sales: Money,
    pub total_purchases: Money,
    /// Newest first, at most [`RECENT_TRANSACTIONS`].
    pub recent_transactions: Vec<Transaction>,
    /// Sorted by category name.
    pub stock_by_category: Vec<CategoryStock>,
    /// Oldest day first, [`TREND_DAYS`] entries ending today.
    pub sales_trend: Vec<DailySales>,
}

pub const RECENT_TRANSACTIONS: usize = 5;
pub const TREND_DAYS: i64 = 7;

impl DashboardStats {
    #[must_use]
    pub fn compute(products: &[Product], transactions: &[Transaction], now: DateTime<Utc>) -> Self {
        let total_of = |kind: TransactionKind| -> Money {
            transactions
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.total_amount)
                .sum()
        };

        let mut recent = transactions.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_TRANSACTIONS);

        Self {
            total_products: products.len(),
            low_stock_products: products.iter().filter(|p| p.is_low_stock()).count(),
            total_sales: total_of(TransactionKind::Sale),
            total_purchases: total_of(TransactionKind::Purchase),
            recent_transactions: recent,
            stock_by_category: stock_by_category(products),
            sales_trend: sales_trend(transactions, now.date_naive()),
        }
    }

    /// Largest daily total in the trend, for scaling bars.
    #[must_use]
    pub fn peak_daily_sales(&self) -> Money {
        self.sales_trend
            .iter()
            .map(|d| d.total)
            .max()
            .unwrap_or(Money::ZERO)
    }
}

fn stock_by_category(products: &[Product]) -> Vec<CategoryStock> {
    let mut by_category: BTreeMap<&str, (u32, Money)> = BTreeMap::new();
    for product in products {
        let entry = by_category
            .entry(product.category.as_str())
            .or_insert((0, Money::ZERO));
        entry.0 = entry.0.saturating_add(product.stock);
        entry.1 = entry.1 + product.stock_value();
    }
    by_category
        .into_iter()
        .map(|(category, (units, value))| CategoryStock {
            category: category.to_string(),
            units,
            value,
        })
        .collect()
}

fn sales_trend(transactions: &[Transaction], today: NaiveDate) -> Vec<DailySales> {
    (0..TREND_DAYS)
        .rev()
        .map(|days_ago| {
            let day = today - TimeDelta::days(days_ago);
            let sales = transactions
                .iter()
                .filter(|t| t.kind == TransactionKind::Sale && t.created_at.date_naive() == day);
            let (total, units) = sales.fold((Money::ZERO, 0_u32), |(total, units), t| {
                (total + t.total_amount, units.saturating_add(t.quantity))
            });
            DailySales { day, total, units }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    #[test]
    fn test_seed_figures() {
        let now = Utc::now();
        let stats = DashboardStats::compute(&seed::products(now), &seed::transactions(now), now);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.low_stock_products, 1);
        assert_eq!(stats.total_sales, Money::from_cents(44997));
        assert_eq!(stats.total_purchases, Money::from_cents(22500));
        assert_eq!(stats.recent_transactions.len(), 4);
        assert!(stats.recent_transactions[0].created_at >= stats.recent_transactions[1].created_at);
    }

    #[test]
    fn test_trend_covers_a_week_ending_today() {
        let now = Utc::now();
        let stats = DashboardStats::compute(&seed::products(now), &seed::transactions(now), now);
        assert_eq!(stats.sales_trend.len(), 7);
        assert_eq!(stats.sales_trend.last().map(|d| d.day), Some(now.date_naive()));
        let trend_total: Money = stats.sales_trend.iter().map(|d| d.total).sum();
        assert_eq!(trend_total, stats.total_sales);
        assert_eq!(stats.peak_daily_sales(), Money::from_cents(24999));
    }

    #[test]
    fn test_stock_by_category_sorted() {
        let now = Utc::now();
        let stats = DashboardStats::compute(&seed::products(now), &[], now);
        let names: Vec<_> = stats
            .stock_by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["Electronics", "Furniture", "Kitchen"]);
        assert_eq!(stats.total_sales, Money::ZERO);
    }
}
