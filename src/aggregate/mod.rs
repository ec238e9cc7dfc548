//! Grouping and reduction over filtered views.
//!
//! [`aggregate`] groups a view by a [`Dimension`] and reduces each group;
//! [`reduce`] applies one reduction to the whole view (no grouping).
//! Output keeps group-discovery order; callers that want a different
//! ordering sort afterwards (ranking, [`sort_weekdays`], chronological
//! date series).
//!
//! Zero-row policy: `Sum`, `Count`, and `Distinct` are 0 over an empty
//! selection; `Mean` fails with `EmptyGroup` so no non-finite value can
//! reach a report.

use std::collections::{HashMap, HashSet};

use crate::data::schema::{Transaction, WEEKDAYS, weekday_name, weekday_position};
use crate::error::{Error, Result};
use crate::filter::FilteredView;

// ---------------------------------------------------------------------------
// Dimensions and fields
// ---------------------------------------------------------------------------

/// Categorical field usable as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Category,
    Store,
    Channel,
    Date,
    Product,
    Customer,
    PaymentMethod,
    Segment,
    Weekday,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Dimension::Category,
        Dimension::Store,
        Dimension::Channel,
        Dimension::Date,
        Dimension::Product,
        Dimension::Customer,
        Dimension::PaymentMethod,
        Dimension::Segment,
        Dimension::Weekday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Store => "store",
            Dimension::Channel => "channel",
            Dimension::Date => "date",
            Dimension::Product => "product",
            Dimension::Customer => "customer",
            Dimension::PaymentMethod => "payment",
            Dimension::Segment => "segment",
            Dimension::Weekday => "weekday",
        }
    }

    pub fn parse(s: &str) -> Option<Dimension> {
        Dimension::ALL
            .into_iter()
            .find(|dim| dim.as_str() == s.to_lowercase())
    }

    fn key_of(&self, tx: &Transaction) -> String {
        match self {
            Dimension::Category => tx.product_category.clone(),
            Dimension::Store => tx.store_location.clone(),
            Dimension::Channel => tx.channel.as_str().to_string(),
            Dimension::Date => tx.date.format("%Y-%m-%d").to_string(),
            Dimension::Product => tx.product_name.clone(),
            Dimension::Customer => tx.customer_id.clone(),
            Dimension::PaymentMethod => tx.payment_method.clone(),
            Dimension::Segment => tx.customer_segment.clone(),
            Dimension::Weekday => weekday_name(tx.day_of_week).to_string(),
        }
    }
}

/// Numeric column for `Sum`/`Mean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    LineRevenue,
    Quantity,
    UnitPrice,
    DiscountApplied,
}

impl NumericField {
    fn of(&self, tx: &Transaction) -> f64 {
        match self {
            NumericField::LineRevenue => tx.line_revenue,
            NumericField::Quantity => f64::from(tx.quantity),
            NumericField::UnitPrice => tx.unit_price,
            NumericField::DiscountApplied => tx.discount_applied,
        }
    }
}

/// Text column for `Distinct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    TransactionId,
    StoreId,
    ProductId,
    ProductName,
    CustomerId,
    CustomerSegment,
    PaymentMethod,
}

impl TextField {
    fn of<'a>(&self, tx: &'a Transaction) -> &'a str {
        match self {
            TextField::TransactionId => &tx.transaction_id,
            TextField::StoreId => &tx.store_id,
            TextField::ProductId => &tx.product_id,
            TextField::ProductName => &tx.product_name,
            TextField::CustomerId => &tx.customer_id,
            TextField::CustomerSegment => &tx.customer_segment,
            TextField::PaymentMethod => &tx.payment_method,
        }
    }
}

/// How to collapse a set of rows into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum(NumericField),
    Mean(NumericField),
    Count,
    Distinct(TextField),
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Group the view by `dim` and reduce each group. Pair order is the order
/// groups were first seen in the view.
pub fn aggregate(
    view: &FilteredView,
    dim: Dimension,
    reduction: Reduction,
) -> Result<Vec<(String, f64)>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&Transaction>)> = Vec::new();

    for tx in view.rows() {
        let key = dim.key_of(tx);
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(tx),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![tx]));
            }
        }
    }

    let mut pairs = Vec::with_capacity(groups.len());
    for (key, rows) in groups {
        let value = reduce_rows(&rows, reduction)?;
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Reduce the whole view to one value (group key = entire view).
pub fn reduce(view: &FilteredView, reduction: Reduction) -> Result<f64> {
    let rows: Vec<&Transaction> = view.rows().collect();
    reduce_rows(&rows, reduction)
}

fn reduce_rows(rows: &[&Transaction], reduction: Reduction) -> Result<f64> {
    match reduction {
        Reduction::Sum(field) => Ok(rows.iter().map(|tx| field.of(tx)).sum()),
        Reduction::Mean(field) => {
            if rows.is_empty() {
                return Err(Error::EmptyGroup);
            }
            let sum: f64 = rows.iter().map(|tx| field.of(tx)).sum();
            Ok(sum / rows.len() as f64)
        }
        Reduction::Count => Ok(rows.len() as f64),
        Reduction::Distinct(field) => {
            let values: HashSet<&str> = rows.iter().map(|tx| field.of(tx)).collect();
            Ok(values.len() as f64)
        }
    }
}

/// Reorder weekday pairs to calendar order, Monday through Sunday.
/// Independent of how the groups were discovered.
pub fn sort_weekdays(pairs: &mut [(String, f64)]) {
    pairs.sort_by_key(|(name, _)| weekday_position(name).unwrap_or(WEEKDAYS.len()));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::from_reader;
    use crate::data::schema::SalesTable;
    use crate::filter::{FilterSpec, apply};

    const SAMPLE: &str = "\
transaction_id,date,store_id,store_location,channel,product_id,product_name,product_category,quantity,unit_price,discount_applied,customer_id,customer_segment,payment_method
T1,2024-01-01,S1,StoreA,In-store,P1,Beans,CategoryX,2,10.00,0.00,C1,Regular,Cash
T2,2024-01-02,S2,StoreB,Online,P2,Mixer,CategoryY,1,50.00,5.00,C2,Premium,Credit Card
T3,2024-01-03,S1,StoreA,Online,P3,Filters,CategoryX,3,5.00,0.00,C1,Regular,Cash
";

    fn sample_table() -> SalesTable {
        from_reader(SAMPLE.as_bytes()).unwrap()
    }

    const REVENUE: Reduction = Reduction::Sum(NumericField::LineRevenue);

    #[test]
    fn test_sum_by_category_discovery_order() {
        let table = sample_table();
        let view = apply(&table, &FilterSpec::default());
        let pairs = aggregate(&view, Dimension::Category, REVENUE).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("CategoryX".to_string(), 35.0),
                ("CategoryY".to_string(), 45.0)
            ]
        );
    }

    #[test]
    fn test_mean_by_store() {
        let table = sample_table();
        let view = apply(&table, &FilterSpec::default());
        let pairs = aggregate(
            &view,
            Dimension::Store,
            Reduction::Mean(NumericField::LineRevenue),
        )
        .unwrap();
        assert_eq!(
            pairs,
            vec![("StoreA".to_string(), 17.5), ("StoreB".to_string(), 45.0)]
        );
    }

    #[test]
    fn test_count_by_channel() {
        let table = sample_table();
        let view = apply(&table, &FilterSpec::default());
        let pairs = aggregate(&view, Dimension::Channel, Reduction::Count).unwrap();
        assert_eq!(
            pairs,
            vec![("In-store".to_string(), 1.0), ("Online".to_string(), 2.0)]
        );
    }

    #[test]
    fn test_distinct_customers_per_store() {
        let table = sample_table();
        let view = apply(&table, &FilterSpec::default());
        let pairs = aggregate(
            &view,
            Dimension::Store,
            Reduction::Distinct(TextField::CustomerId),
        )
        .unwrap();
        assert_eq!(
            pairs,
            vec![("StoreA".to_string(), 1.0), ("StoreB".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_whole_view_reductions() {
        let table = sample_table();
        let view = apply(&table, &FilterSpec::default());

        assert_eq!(reduce(&view, REVENUE).unwrap(), 80.0);
        assert_eq!(reduce(&view, Reduction::Count).unwrap(), 3.0);
        assert_eq!(
            reduce(&view, Reduction::Distinct(TextField::CustomerId)).unwrap(),
            2.0
        );
    }

    #[test]
    fn test_empty_selection_zero_for_sum_and_count() {
        let table = sample_table();
        let spec = FilterSpec {
            categories: vec!["Nothing".to_string()],
            ..FilterSpec::default()
        };
        let view = apply(&table, &spec);

        assert_eq!(reduce(&view, REVENUE).unwrap(), 0.0);
        assert_eq!(reduce(&view, Reduction::Count).unwrap(), 0.0);
        assert_eq!(
            reduce(&view, Reduction::Distinct(TextField::ProductId)).unwrap(),
            0.0
        );
        assert!(aggregate(&view, Dimension::Store, REVENUE).unwrap().is_empty());
    }

    #[test]
    fn test_mean_over_empty_selection_fails() {
        let table = sample_table();
        let spec = FilterSpec {
            categories: vec!["Nothing".to_string()],
            ..FilterSpec::default()
        };
        let view = apply(&table, &spec);

        let err = reduce(&view, Reduction::Mean(NumericField::LineRevenue)).unwrap_err();
        assert!(matches!(err, Error::EmptyGroup));
    }

    #[test]
    fn test_group_sums_partition_the_total() {
        let table = sample_table();
        let view = apply(&table, &FilterSpec::default());

        let total = reduce(&view, REVENUE).unwrap();
        for dim in Dimension::ALL {
            let pairs = aggregate(&view, dim, REVENUE).unwrap();
            let sum: f64 = pairs.iter().map(|(_, v)| v).sum();
            assert!(
                (sum - total).abs() < 1e-9,
                "partition by {} lost revenue: {sum} vs {total}",
                dim.as_str()
            );
        }
    }

    #[test]
    fn test_sort_weekdays_calendar_order() {
        let mut pairs = vec![
            ("Sunday".to_string(), 1.0),
            ("Monday".to_string(), 2.0),
            ("Friday".to_string(), 3.0),
        ];
        sort_weekdays(&mut pairs);
        let names: Vec<&str> = pairs.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Monday", "Friday", "Sunday"]);
    }

    const OUT_OF_ORDER: &str = "\
transaction_id,date,store_id,store_location,channel,product_id,product_name,product_category,quantity,unit_price,discount_applied,customer_id,customer_segment,payment_method
T1,2024-01-03,S1,StoreA,Online,P1,Beans,CategoryX,1,10.00,0.00,C1,Regular,Cash
T2,2024-01-01,S1,StoreA,Online,P1,Beans,CategoryX,1,20.00,0.00,C1,Regular,Cash
T3,2024-01-02,S1,StoreA,Online,P1,Beans,CategoryX,1,30.00,0.00,C1,Regular,Cash
";

    #[test]
    fn test_weekday_aggregation_sorted_from_any_discovery_order() {
        // Rows dated Wed, Mon, Tue so discovery order differs from calendar.
        let table = from_reader(OUT_OF_ORDER.as_bytes()).unwrap();
        let view = apply(&table, &FilterSpec::default());

        let mut pairs = aggregate(&view, Dimension::Weekday, REVENUE).unwrap();
        assert_eq!(pairs[0].0, "Wednesday");

        sort_weekdays(&mut pairs);
        assert_eq!(
            pairs,
            vec![
                ("Monday".to_string(), 20.0),
                ("Tuesday".to_string(), 30.0),
                ("Wednesday".to_string(), 10.0)
            ]
        );
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!(Dimension::parse("category"), Some(Dimension::Category));
        assert_eq!(Dimension::parse("Weekday"), Some(Dimension::Weekday));
        assert_eq!(Dimension::parse("quarter"), None);
    }
}
