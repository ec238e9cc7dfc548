//! Filter specification and predicate composition.
//!
//! A [`FilterSpec`] is a plain value: date range (inclusive both ends),
//! store set, channel selector, category set. [`apply`] evaluates the AND
//! of the four predicates over a canonical table and returns a borrowed
//! view. Conventions, all deliberate:
//! - an empty store or category set passes every row
//! - [`ChannelSelector::All`] passes every row
//! - `start > end` yields an empty view, not an error
//!
//! Each report builds its own spec; any number of views may coexist over
//! one table.

use chrono::NaiveDate;

use crate::data::schema::{Channel, SalesTable, Transaction};
use crate::data::DATE_FORMAT;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Channel selector
// ---------------------------------------------------------------------------

/// Channel restriction: either a single channel or the "All" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelSelector {
    #[default]
    All,
    Only(Channel),
}

impl ChannelSelector {
    /// Parse user input (CLI flag or query parameter), case-insensitive.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "in-store" | "instore" => Ok(Self::Only(Channel::InStore)),
            "online" => Ok(Self::Only(Channel::Online)),
            other => Err(Error::InvalidFilter(format!(
                "unknown channel {other:?} (expected \"In-store\", \"Online\", or \"All\")"
            ))),
        }
    }

    pub fn admits(&self, channel: Channel) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == channel,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// Which rows of the canonical table are in scope for one report.
/// The default spec passes every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub stores: Vec<String>,
    pub channel: ChannelSelector,
    pub categories: Vec<String>,
}

impl FilterSpec {
    /// Build a spec from user-supplied text. A malformed date or unknown
    /// channel aborts with `InvalidFilter`; bounds are never silently
    /// dropped.
    pub fn build(
        from: Option<&str>,
        to: Option<&str>,
        stores: Vec<String>,
        channel: Option<&str>,
        categories: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            start: from.map(|s| parse_date_bound("from", s)).transpose()?,
            end: to.map(|s| parse_date_bound("to", s)).transpose()?,
            stores,
            channel: channel.map(ChannelSelector::parse).transpose()?.unwrap_or_default(),
            categories,
        })
    }

    /// True when the row passes all four predicates.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.start.is_none_or(|start| tx.date >= start)
            && self.end.is_none_or(|end| tx.date <= end)
            && (self.stores.is_empty() || self.stores.iter().any(|s| *s == tx.store_location))
            && self.channel.admits(tx.channel)
            && (self.categories.is_empty()
                || self.categories.iter().any(|c| *c == tx.product_category))
    }
}

/// Parse one date bound, strict ISO format.
pub fn parse_date_bound(label: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| Error::InvalidFilter(format!("{label} date {s:?} is not YYYY-MM-DD")))
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of one canonical table that passed a spec. Borrows the table;
/// building a view never copies or mutates transactions.
#[derive(Debug)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Transaction>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.rows.iter().copied()
    }
}

/// Evaluate a spec over the table. Predicate order is irrelevant; the
/// result preserves table row order.
pub fn apply<'a>(table: &'a SalesTable, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView {
        rows: table.rows().iter().filter(|tx| spec.matches(tx)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::from_reader;

    const SAMPLE: &str = "\
transaction_id,date,store_id,store_location,channel,product_id,product_name,product_category,quantity,unit_price,discount_applied,customer_id,customer_segment,payment_method
T1,2024-01-01,S1,StoreA,In-store,P1,Beans,CategoryX,2,10.00,0.00,C1,Regular,Cash
T2,2024-01-02,S2,StoreB,Online,P2,Mixer,CategoryY,1,50.00,5.00,C2,Premium,Credit Card
T3,2024-01-03,S1,StoreA,Online,P3,Filters,CategoryX,3,5.00,0.00,C1,Regular,Cash
";

    fn sample_table() -> SalesTable {
        from_reader(SAMPLE.as_bytes()).unwrap()
    }

    fn ids<'a>(view: &FilteredView<'a>) -> Vec<&'a str> {
        view.rows().map(|tx| tx.transaction_id.as_str()).collect()
    }

    #[test]
    fn test_default_spec_passes_everything() {
        let table = sample_table();
        let view = apply(&table, &FilterSpec::default());
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn test_date_range_inclusive_both_ends() {
        let table = sample_table();
        let spec = FilterSpec::build(Some("2024-01-01"), Some("2024-01-02"), vec![], None, vec![])
            .unwrap();
        assert_eq!(ids(&apply(&table, &spec)), vec!["T1", "T2"]);

        let single = FilterSpec::build(Some("2024-01-02"), Some("2024-01-02"), vec![], None, vec![])
            .unwrap();
        assert_eq!(ids(&apply(&table, &single)), vec!["T2"]);
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let table = sample_table();
        let spec = FilterSpec::build(Some("2024-01-03"), Some("2024-01-01"), vec![], None, vec![])
            .unwrap();
        let view = apply(&table, &spec);
        assert!(view.is_empty());
    }

    #[test]
    fn test_store_membership() {
        let table = sample_table();
        let spec = FilterSpec {
            stores: vec!["StoreA".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&table, &spec)), vec!["T1", "T3"]);
    }

    #[test]
    fn test_empty_sets_pass_through() {
        let table = sample_table();
        let spec = FilterSpec {
            stores: vec![],
            categories: vec![],
            ..FilterSpec::default()
        };
        assert_eq!(apply(&table, &spec).len(), 3);
    }

    #[test]
    fn test_channel_selector() {
        let table = sample_table();
        let spec = FilterSpec {
            channel: ChannelSelector::Only(Channel::Online),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&table, &spec)), vec!["T2", "T3"]);
    }

    #[test]
    fn test_category_membership() {
        let table = sample_table();
        let spec = FilterSpec {
            categories: vec!["CategoryY".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&table, &spec)), vec!["T2"]);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let table = sample_table();
        let spec = FilterSpec {
            stores: vec!["StoreA".to_string()],
            channel: ChannelSelector::Only(Channel::Online),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&table, &spec)), vec!["T3"]);
    }

    #[test]
    fn test_malformed_date_is_invalid_filter() {
        let err = FilterSpec::build(Some("01/05/2024"), None, vec![], None, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));
        assert!(err.to_string().contains("01/05/2024"));
    }

    #[test]
    fn test_channel_parse_is_lenient_on_case_only() {
        assert_eq!(ChannelSelector::parse("all").unwrap(), ChannelSelector::All);
        assert_eq!(
            ChannelSelector::parse("In-Store").unwrap(),
            ChannelSelector::Only(Channel::InStore)
        );
        assert_eq!(
            ChannelSelector::parse("ONLINE").unwrap(),
            ChannelSelector::Only(Channel::Online)
        );
        assert!(matches!(
            ChannelSelector::parse("curbside"),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_simultaneous_views_do_not_interfere() {
        let table = sample_table();
        let store_a = FilterSpec {
            stores: vec!["StoreA".to_string()],
            ..FilterSpec::default()
        };
        let online = FilterSpec {
            channel: ChannelSelector::Only(Channel::Online),
            ..FilterSpec::default()
        };

        let view_a = apply(&table, &store_a);
        let view_b = apply(&table, &online);

        assert_eq!(ids(&view_a), vec!["T1", "T3"]);
        assert_eq!(ids(&view_b), vec!["T2", "T3"]);
        assert_eq!(table.len(), 3);
    }
}
