//! # Analytics Aggregator
//!
//! Filters the delivered archive by period and summarises revenue and
//! best-selling products.
//!
//! ## Pipeline
//! ```text
//! archive ──► filter_delivered(period, reference) ──► aggregate() ──► SalesSummary
//!                                                          │
//!                                   SalesReport::build ◄───┘ (+ period label, orders)
//! ```
//!
//! ## Calendar Semantics
//! Delivery instants are converted into the reference time's zone before
//! they are truncated to a day, month or year. Production passes the local
//! clock; tests pass a fixed offset. Day or month values that do not form a
//! real date match nothing.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::DeliveredOrder;
use crate::TOP_PRODUCTS_LIMIT;

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

// =============================================================================
// Period
// =============================================================================

/// Which slice of the archive a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodSpec {
    /// The reference date.
    Today,
    Month { year: i32, month: u32 },
    Year { year: i32 },
    Day { year: i32, month: u32, day: u32 },
}

impl PeriodSpec {
    /// Human-facing label: `Hoje`, `Março 2024`, `2024`, `5/3/2024`.
    pub fn label(&self) -> String {
        match self {
            PeriodSpec::Today => "Hoje".to_string(),
            PeriodSpec::Month { year, month } => {
                let name = month
                    .checked_sub(1)
                    .and_then(|i| MONTH_NAMES.get(i as usize))
                    .copied()
                    .unwrap_or("?");
                format!("{} {}", name, year)
            }
            PeriodSpec::Year { year } => year.to_string(),
            PeriodSpec::Day { year, month, day } => format!("{}/{}/{}", day, month, year),
        }
    }

    /// True if `instant` falls in this period, seen from `reference`'s zone.
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Utc>, reference: &DateTime<Tz>) -> bool {
        let local = instant.with_timezone(&reference.timezone());
        match *self {
            PeriodSpec::Today => local.date_naive() == reference.date_naive(),
            PeriodSpec::Month { year, month } => local.year() == year && local.month() == month,
            PeriodSpec::Year { year } => local.year() == year,
            PeriodSpec::Day { year, month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .map_or(false, |date| local.date_naive() == date),
        }
    }
}

/// Archived orders delivered within `period`, in archive order.
pub fn filter_delivered<'a, Tz: TimeZone>(
    orders: &'a [DeliveredOrder],
    period: &PeriodSpec,
    reference: &DateTime<Tz>,
) -> Vec<&'a DeliveredOrder> {
    orders
        .iter()
        .filter(|o| period.contains(&o.delivered_at, reference))
        .collect()
}

// =============================================================================
// Aggregation
// =============================================================================

/// Sales of one product name across the aggregated orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductStat {
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
    /// Premium flag of the first line seen with this name.
    pub premium: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: Money,
    pub order_count: usize,
    /// Every product, in first-seen order.
    pub product_stats: Vec<ProductStat>,
    /// Best sellers by revenue; ties keep first-seen order.
    pub top_products: Vec<ProductStat>,
}

/// Sums revenue and per-product sales over `orders`.
///
/// Products are keyed by line name, so two composite pizzas with the same
/// flavors count as the same product.
pub fn aggregate<'a, I>(orders: I) -> SalesSummary
where
    I: IntoIterator<Item = &'a DeliveredOrder>,
{
    let mut total_revenue = Money::zero();
    let mut order_count = 0;
    let mut product_stats: Vec<ProductStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for delivered in orders {
        total_revenue += delivered.total();
        order_count += 1;

        for line in &delivered.order.items {
            let slot = *index.entry(line.name().to_string()).or_insert_with(|| {
                product_stats.push(ProductStat {
                    name: line.name().to_string(),
                    quantity: 0,
                    revenue: Money::zero(),
                    premium: line.item.is_premium(),
                });
                product_stats.len() - 1
            });

            let stat = &mut product_stats[slot];
            stat.quantity += line.quantity;
            stat.revenue += line.line_total();
        }
    }

    let mut top_products = product_stats.clone();
    top_products.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    top_products.truncate(TOP_PRODUCTS_LIMIT);

    SalesSummary {
        total_revenue,
        order_count,
        product_stats,
        top_products,
    }
}

// =============================================================================
// Report Document
// =============================================================================

/// The export document handed to printing or download.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period: String,
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
    pub total_revenue: Money,
    pub total_orders: usize,
    pub top_products: Vec<ProductStat>,
    /// Matching orders, most recently delivered first.
    pub orders: Vec<DeliveredOrder>,
}

impl SalesReport {
    pub fn build<Tz: TimeZone>(
        archive: &[DeliveredOrder],
        period: &PeriodSpec,
        reference: &DateTime<Tz>,
    ) -> Self {
        let filtered = filter_delivered(archive, period, reference);
        let summary = aggregate(filtered.iter().copied());

        let mut orders: Vec<DeliveredOrder> = filtered.into_iter().cloned().collect();
        orders.sort_by(|a, b| b.delivered_at.cmp(&a.delivered_at));

        SalesReport {
            period: period.label(),
            generated_at: reference.with_timezone(&Utc),
            total_revenue: summary.total_revenue,
            total_orders: summary.order_count,
            top_products: summary.top_products,
            orders,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
