//! Top-N ranking over aggregated pairs.
//!
//! Descending by value, ties broken by ascending key so equal values never
//! produce nondeterministic output. Ranks start at 1. Asking for more
//! entries than exist returns them all.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::aggregate::{Dimension, NumericField, Reduction, aggregate};
use crate::error::Result;
use crate::filter::FilteredView;

/// One entry of a ranked table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub key: String,
    pub value: f64,
}

/// A ranked customer, enriched with a representative segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCustomer {
    pub rank: usize,
    pub customer_id: String,
    pub segment: String,
    pub revenue: f64,
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Sort pairs in place: descending by value, ties ascending by key.
pub fn sort_desc(pairs: &mut [(String, f64)]) {
    pairs.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
}

/// Rank pairs descending by value and keep the first `n`.
pub fn top_n(pairs: &[(String, f64)], n: usize) -> Vec<RankedEntry> {
    let mut sorted = pairs.to_vec();
    sort_desc(&mut sorted);

    sorted
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (key, value))| RankedEntry {
            rank: i + 1,
            key,
            value,
        })
        .collect()
}

/// Top `n` products by summed line revenue.
pub fn top_products(view: &FilteredView, n: usize) -> Result<Vec<RankedEntry>> {
    let pairs = aggregate(
        view,
        Dimension::Product,
        Reduction::Sum(NumericField::LineRevenue),
    )?;
    Ok(top_n(&pairs, n))
}

/// Top `n` customers by summed line revenue, each joined with the
/// first-encountered segment from the view. When a customer's rows carry
/// conflicting segments the earliest row wins, stable w.r.t. input order.
pub fn top_customers(view: &FilteredView, n: usize) -> Result<Vec<RankedCustomer>> {
    let pairs = aggregate(
        view,
        Dimension::Customer,
        Reduction::Sum(NumericField::LineRevenue),
    )?;
    let ranked = top_n(&pairs, n);

    let mut segments: HashMap<&str, &str> = HashMap::new();
    for tx in view.rows() {
        segments
            .entry(tx.customer_id.as_str())
            .or_insert(tx.customer_segment.as_str());
    }

    Ok(ranked
        .into_iter()
        .map(|entry| RankedCustomer {
            rank: entry.rank,
            segment: segments
                .get(entry.key.as_str())
                .copied()
                .unwrap_or_default()
                .to_string(),
            customer_id: entry.key,
            revenue: entry.value,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
