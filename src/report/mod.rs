//! Report assembly — packages engine output into presentation shapes.
//!
//! Every function takes the canonical table plus one [`FilterSpec`], builds
//! its own view, and returns a value the CLI, menu, and web layers can all
//! consume. No computation happens here beyond composing the filter,
//! aggregation, and ranking modules.

use serde::Serialize;

use crate::aggregate::{
    Dimension, NumericField, Reduction, TextField, aggregate, reduce, sort_weekdays,
};
use crate::data::schema::{SalesTable, Transaction};
use crate::data::to_csv;
use crate::error::{Error, Result};
use crate::filter::{FilterSpec, apply};
use crate::rank::{self, RankedCustomer, RankedEntry};

const REVENUE: Reduction = Reduction::Sum(NumericField::LineRevenue);

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

/// Headline figures for one filtered selection.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_revenue: f64,
    /// Rows in the selection (one row per sale line item).
    pub transactions: usize,
    /// Mean revenue per transaction; `None` when nothing matched, so no
    /// non-finite value ever reaches a display.
    pub mean_revenue: Option<f64>,
    pub unique_customers: usize,
    pub unique_products: usize,
    /// Size of the canonical table the selection was drawn from.
    pub total_rows: usize,
}

/// Compute the KPI summary for one spec.
pub fn summary(table: &SalesTable, spec: &FilterSpec) -> Result<Summary> {
    let view = apply(table, spec);

    let total_revenue = reduce(&view, REVENUE)?;
    let mean_revenue = match reduce(&view, Reduction::Mean(NumericField::LineRevenue)) {
        Ok(value) => Some(value),
        Err(Error::EmptyGroup) => None,
        Err(e) => return Err(e),
    };
    let unique_customers = reduce(&view, Reduction::Distinct(TextField::CustomerId))? as usize;
    let unique_products = reduce(&view, Reduction::Distinct(TextField::ProductId))? as usize;

    Ok(Summary {
        total_revenue,
        transactions: view.len(),
        mean_revenue,
        unique_customers,
        unique_products,
        total_rows: table.len(),
    })
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Revenue grouped by a dimension, ordered for display: chronological for
/// dates, Monday-first for weekdays, descending by revenue otherwise.
pub fn revenue_breakdown(
    table: &SalesTable,
    spec: &FilterSpec,
    dim: Dimension,
) -> Result<Vec<(String, f64)>> {
    let view = apply(table, spec);
    let mut pairs = aggregate(&view, dim, REVENUE)?;
    match dim {
        Dimension::Date => pairs.sort_by(|a, b| a.0.cmp(&b.0)),
        Dimension::Weekday => sort_weekdays(&mut pairs),
        _ => rank::sort_desc(&mut pairs),
    }
    Ok(pairs)
}

/// Transaction counts per channel, largest first.
pub fn channel_counts(table: &SalesTable, spec: &FilterSpec) -> Result<Vec<(String, u64)>> {
    let view = apply(table, spec);
    let mut pairs = aggregate(&view, Dimension::Channel, Reduction::Count)?;
    rank::sort_desc(&mut pairs);
    Ok(pairs
        .into_iter()
        .map(|(key, count)| (key, count as u64))
        .collect())
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

pub fn top_products(table: &SalesTable, spec: &FilterSpec, n: usize) -> Result<Vec<RankedEntry>> {
    let view = apply(table, spec);
    rank::top_products(&view, n)
}

pub fn top_customers(
    table: &SalesTable,
    spec: &FilterSpec,
    n: usize,
) -> Result<Vec<RankedCustomer>> {
    let view = apply(table, spec);
    rank::top_customers(&view, n)
}

// ---------------------------------------------------------------------------
// Sample and export
// ---------------------------------------------------------------------------

/// One row of the sample table, dates and channels already readable.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRow {
    pub transaction_id: String,
    pub date: String,
    pub store_location: String,
    pub channel: String,
    pub product_name: String,
    pub product_category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_applied: f64,
    pub line_revenue: f64,
    pub customer_id: String,
    pub customer_segment: String,
    pub payment_method: String,
    pub day_of_week: String,
}

impl From<&Transaction> for SampleRow {
    fn from(tx: &Transaction) -> Self {
        SampleRow {
            transaction_id: tx.transaction_id.clone(),
            date: tx.date.format("%Y-%m-%d").to_string(),
            store_location: tx.store_location.clone(),
            channel: tx.channel.to_string(),
            product_name: tx.product_name.clone(),
            product_category: tx.product_category.clone(),
            quantity: tx.quantity,
            unit_price: tx.unit_price,
            discount_applied: tx.discount_applied,
            line_revenue: tx.line_revenue,
            customer_id: tx.customer_id.clone(),
            customer_segment: tx.customer_segment.clone(),
            payment_method: tx.payment_method.clone(),
            day_of_week: crate::data::weekday_name(tx.day_of_week).to_string(),
        }
    }
}

/// First `limit` rows of the selection, in table order.
pub fn sample(table: &SalesTable, spec: &FilterSpec, limit: usize) -> Vec<SampleRow> {
    apply(table, spec)
        .rows()
        .take(limit)
        .map(SampleRow::from)
        .collect()
}

/// Serialize the whole selection back to source-format CSV.
pub fn export(table: &SalesTable, spec: &FilterSpec) -> Result<String> {
    let view = apply(table, spec);
    to_csv(view.rows())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
