//! Canonical transaction schema and the immutable sales table.
//!
//! One `Transaction` per sale line item. Derived fields (`line_revenue`,
//! `day_of_week`) are computed once at normalization so every report sees
//! the same values.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Stored column set and order of the source file. Exports reproduce this
/// exactly; derived columns are never written.
pub const COLUMNS: [&str; 14] = [
    "transaction_id",
    "date",
    "store_id",
    "store_location",
    "channel",
    "product_id",
    "product_name",
    "product_category",
    "quantity",
    "unit_price",
    "discount_applied",
    "customer_id",
    "customer_segment",
    "payment_method",
];

/// One row as it appears in the source file, prior to normalization.
/// Field order matches [`COLUMNS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub transaction_id: String,
    pub date: String,
    pub store_id: String,
    pub store_location: String,
    pub channel: String,
    pub product_id: String,
    pub product_name: String,
    pub product_category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_applied: f64,
    pub customer_id: String,
    pub customer_segment: String,
    pub payment_method: String,
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Sales channel. Closed enum: normalization rejects any other value, so
/// per-channel partitions always cover the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    InStore,
    Online,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::InStore, Channel::Online];

    /// Exact source-file spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::InStore => "In-store",
            Channel::Online => "Online",
        }
    }

    /// Parse the exact source-file spelling. `None` for anything else.
    pub fn parse(s: &str) -> Option<Channel> {
        match s {
            "In-store" => Some(Channel::InStore),
            "Online" => Some(Channel::Online),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

/// Weekday display names, Monday-first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Full display name for a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize]
}

/// Monday-first position of a weekday display name, if it is one.
pub fn weekday_position(name: &str) -> Option<usize> {
    WEEKDAYS.iter().position(|w| *w == name)
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A normalized sale line item. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub store_id: String,
    pub store_location: String,
    pub channel: Channel,
    pub product_id: String,
    pub product_name: String,
    pub product_category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_applied: f64,
    pub customer_id: String,
    pub customer_segment: String,
    pub payment_method: String,
    /// quantity × unit_price − discount_applied. May be negative when the
    /// discount exceeds the subtotal; propagated as-is.
    pub line_revenue: f64,
    pub day_of_week: Weekday,
}

impl Transaction {
    /// Stored fields back in source-file form, for export.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            transaction_id: self.transaction_id.clone(),
            date: self.date.format("%Y-%m-%d").to_string(),
            store_id: self.store_id.clone(),
            store_location: self.store_location.clone(),
            channel: self.channel.as_str().to_string(),
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            product_category: self.product_category.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount_applied: self.discount_applied,
            customer_id: self.customer_id.clone(),
            customer_segment: self.customer_segment.clone(),
            payment_method: self.payment_method.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sales table
// ---------------------------------------------------------------------------

/// The canonical in-memory transaction set. Built once by the loader,
/// read-only afterwards; filtering and aggregation borrow from it and
/// never mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    rows: Vec<Transaction>,
    stores: BTreeMap<String, String>,
}

impl SalesTable {
    pub(crate) fn new(rows: Vec<Transaction>, stores: BTreeMap<String, String>) -> Self {
        Self { rows, stores }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// store_id → store_location, sorted by store_id.
    pub fn store_directory(&self) -> &BTreeMap<String, String> {
        &self.stores
    }

    /// Distinct store locations, sorted.
    pub fn locations(&self) -> Vec<String> {
        self.distinct(|t| &t.store_location)
    }

    /// Distinct product categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.distinct(|t| &t.product_category)
    }

    /// Distinct payment methods, sorted.
    pub fn payment_methods(&self) -> Vec<String> {
        self.distinct(|t| &t.payment_method)
    }

    /// Distinct customer segments, sorted.
    pub fn segments(&self) -> Vec<String> {
        self.distinct(|t| &t.customer_segment)
    }

    /// Earliest and latest transaction dates, `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date;
        let mut min = first;
        let mut max = first;
        for row in &self.rows {
            if row.date < min {
                min = row.date;
            }
            if row.date > max {
                max = row.date;
            }
        }
        Some((min, max))
    }

    fn distinct(&self, field: impl Fn(&Transaction) -> &String) -> Vec<String> {
        let set: BTreeSet<&String> = self.rows.iter().map(field).collect();
        set.into_iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
