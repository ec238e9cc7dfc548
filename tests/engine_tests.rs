/// Engine pipeline tests: filter composition, derived columns,
/// aggregation, and ranking, driven through the public crate API with
/// small in-memory tables. Loader edge cases live in the `data` module's
/// unit tests; report assembly is covered in `report_tests.rs`.
use martlens::Error;
use martlens::aggregate::{self, Dimension, NumericField, Reduction, TextField};
use martlens::data::{self, SalesTable};
use martlens::filter::{self, FilterSpec, FilteredView};
use martlens::rank;

const HEADER: &str = "transaction_id,date,store_id,store_location,channel,product_id,product_name,product_category,quantity,unit_price,discount_applied,customer_id,customer_segment,payment_method";

fn table_from(rows: &[&str]) -> SalesTable {
    let mut csv = String::from(HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    data::from_reader(csv.as_bytes()).unwrap()
}

/// Three-row walkthrough table: two StoreA lines in CategoryX (revenue 20
/// and 15), one StoreB line in CategoryY (revenue 45).
fn walkthrough_table() -> SalesTable {
    table_from(&[
        "T1,2024-01-01,S1,StoreA,In-store,P1,Beans,CategoryX,2,10.00,0.00,C1,Regular,Cash",
        "T2,2024-01-02,S2,StoreB,Online,P2,Mixer,CategoryY,1,50.00,5.00,C2,Premium,Credit Card",
        "T3,2024-01-03,S1,StoreA,Online,P3,Filters,CategoryX,3,5.00,0.00,C1,Regular,Cash",
    ])
}

fn ids<'a>(view: &FilteredView<'a>) -> Vec<&'a str> {
    view.rows().map(|tx| tx.transaction_id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Filter composition
// ---------------------------------------------------------------------------

#[test]
fn empty_spec_passes_every_row() {
    let table = walkthrough_table();
    let view = filter::apply(&table, &FilterSpec::default());
    assert_eq!(view.len(), table.len());
}

#[test]
fn store_filter_keeps_only_matching_rows() {
    let table = walkthrough_table();
    let spec = FilterSpec {
        stores: vec!["StoreA".to_string()],
        ..FilterSpec::default()
    };
    let view = filter::apply(&table, &spec);
    assert_eq!(ids(&view), ["T1", "T3"]);

    let total = aggregate::reduce(&view, Reduction::Sum(NumericField::LineRevenue)).unwrap();
    assert_eq!(total, 35.0);
}

#[test]
fn date_bounds_are_inclusive_on_both_ends() {
    let table = walkthrough_table();
    let spec = FilterSpec::build(Some("2024-01-01"), Some("2024-01-02"), vec![], None, vec![])
        .unwrap();
    let view = filter::apply(&table, &spec);
    assert_eq!(ids(&view), ["T1", "T2"]);
}

#[test]
fn inverted_date_range_yields_empty_view() {
    let table = walkthrough_table();
    let spec = FilterSpec::build(Some("2024-01-03"), Some("2024-01-01"), vec![], None, vec![])
        .unwrap();
    assert!(filter::apply(&table, &spec).is_empty());
}

#[test]
fn channel_and_category_predicates_compose() {
    let table = walkthrough_table();
    let spec = FilterSpec::build(
        None,
        None,
        vec![],
        Some("Online"),
        vec!["CategoryX".to_string()],
    )
    .unwrap();
    let view = filter::apply(&table, &spec);
    assert_eq!(ids(&view), ["T3"]);
}

#[test]
fn filtered_view_never_outgrows_the_table() {
    let table = walkthrough_table();
    let specs = [
        FilterSpec::default(),
        FilterSpec {
            stores: vec!["StoreB".to_string()],
            ..FilterSpec::default()
        },
        FilterSpec {
            stores: vec!["Nowhere".to_string()],
            ..FilterSpec::default()
        },
    ];
    for spec in &specs {
        assert!(filter::apply(&table, spec).len() <= table.len());
    }
}

// ---------------------------------------------------------------------------
// Derived columns
// ---------------------------------------------------------------------------

#[test]
fn line_revenue_is_exactly_quantity_price_minus_discount() {
    let table = walkthrough_table();
    for tx in table.rows() {
        assert_eq!(
            tx.line_revenue,
            f64::from(tx.quantity) * tx.unit_price - tx.discount_applied
        );
    }
}

#[test]
fn over_discounted_lines_stay_negative() {
    let table = table_from(&[
        "T1,2024-01-01,S1,StoreA,In-store,P1,Beans,CategoryX,1,2.00,5.00,C1,Regular,Cash",
    ]);
    assert_eq!(table.rows()[0].line_revenue, -3.0);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn groups_come_out_in_discovery_order() {
    let table = walkthrough_table();
    let view = filter::apply(&table, &FilterSpec::default());
    let pairs = aggregate::aggregate(
        &view,
        Dimension::Store,
        Reduction::Sum(NumericField::LineRevenue),
    )
    .unwrap();
    assert_eq!(
        pairs,
        vec![("StoreA".to_string(), 35.0), ("StoreB".to_string(), 45.0)]
    );
}

#[test]
fn filtered_revenue_by_category_matches_the_walkthrough() {
    let table = walkthrough_table();
    let spec = FilterSpec {
        stores: vec!["StoreA".to_string()],
        ..FilterSpec::default()
    };
    let view = filter::apply(&table, &spec);
    let pairs = aggregate::aggregate(
        &view,
        Dimension::Category,
        Reduction::Sum(NumericField::LineRevenue),
    )
    .unwrap();
    assert_eq!(pairs, vec![("CategoryX".to_string(), 35.0)]);
}

#[test]
fn category_sums_partition_the_view_total() {
    let table = walkthrough_table();
    let view = filter::apply(&table, &FilterSpec::default());
    let total = aggregate::reduce(&view, Reduction::Sum(NumericField::LineRevenue)).unwrap();
    let pairs = aggregate::aggregate(
        &view,
        Dimension::Category,
        Reduction::Sum(NumericField::LineRevenue),
    )
    .unwrap();
    let sum_of_groups: f64 = pairs.iter().map(|(_, v)| v).sum();
    assert!((sum_of_groups - total).abs() < 1e-9);
}

#[test]
fn mean_over_empty_selection_is_an_error() {
    let table = walkthrough_table();
    let spec = FilterSpec {
        stores: vec!["Nowhere".to_string()],
        ..FilterSpec::default()
    };
    let view = filter::apply(&table, &spec);
    let err = aggregate::reduce(&view, Reduction::Mean(NumericField::LineRevenue)).unwrap_err();
    assert!(matches!(err, Error::EmptyGroup));
}

#[test]
fn distinct_counts_unique_values() {
    let table = walkthrough_table();
    let view = filter::apply(&table, &FilterSpec::default());
    let customers =
        aggregate::reduce(&view, Reduction::Distinct(TextField::CustomerId)).unwrap();
    assert_eq!(customers, 2.0);
}

#[test]
fn weekday_groups_sort_monday_first_regardless_of_discovery() {
    // 2024-01-01 was a Monday; rows arrive Wednesday, Sunday, Monday.
    let table = table_from(&[
        "T1,2024-01-03,S1,StoreA,In-store,P1,Beans,CategoryX,1,1.00,0.00,C1,Regular,Cash",
        "T2,2024-01-07,S1,StoreA,In-store,P1,Beans,CategoryX,1,1.00,0.00,C1,Regular,Cash",
        "T3,2024-01-01,S1,StoreA,In-store,P1,Beans,CategoryX,1,1.00,0.00,C1,Regular,Cash",
    ]);
    let view = filter::apply(&table, &FilterSpec::default());
    let mut pairs = aggregate::aggregate(
        &view,
        Dimension::Weekday,
        Reduction::Sum(NumericField::LineRevenue),
    )
    .unwrap();
    aggregate::sort_weekdays(&mut pairs);

    let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["Monday", "Wednesday", "Sunday"]);
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[test]
fn top_product_from_the_unfiltered_walkthrough_is_the_biggest_line() {
    let table = walkthrough_table();
    let view = filter::apply(&table, &FilterSpec::default());
    let top = rank::top_products(&view, 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[0].key, "Mixer");
    assert_eq!(top[0].value, 45.0);
}

#[test]
fn ties_break_alphabetically_on_the_key() {
    let pairs = vec![
        ("Pears".to_string(), 10.0),
        ("Apples".to_string(), 10.0),
        ("Plums".to_string(), 25.0),
    ];
    let ranked = rank::top_n(&pairs, 3);
    let keys: Vec<_> = ranked.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, ["Plums", "Apples", "Pears"]);
    let ranks: Vec<_> = ranked.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, [1, 2, 3]);
}

#[test]
fn ranking_is_idempotent() {
    let pairs = vec![
        ("A".to_string(), 3.0),
        ("B".to_string(), 7.0),
        ("C".to_string(), 5.0),
    ];
    let once = rank::top_n(&pairs, 2);
    let as_pairs: Vec<(String, f64)> =
        once.iter().map(|e| (e.key.clone(), e.value)).collect();
    let twice = rank::top_n(&as_pairs, 2);

    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.rank, b.rank);
        assert_eq!(a.key, b.key);
        assert_eq!(a.value, b.value);
    }
}

#[test]
fn oversized_n_returns_everything_sorted_descending() {
    let pairs = vec![
        ("A".to_string(), 3.0),
        ("B".to_string(), 7.0),
        ("C".to_string(), 5.0),
    ];
    let ranked = rank::top_n(&pairs, 10);
    assert_eq!(ranked.len(), pairs.len());
    assert!(ranked.windows(2).all(|w| w[0].value >= w[1].value));
}

#[test]
fn customer_ranking_uses_the_first_seen_segment() {
    let table = table_from(&[
        "T1,2024-01-01,S1,StoreA,In-store,P1,Beans,CategoryX,1,10.00,0.00,C1,Regular,Cash",
        "T2,2024-01-02,S1,StoreA,Online,P1,Beans,CategoryX,1,10.00,0.00,C1,Premium,Cash",
    ]);
    let view = filter::apply(&table, &FilterSpec::default());
    let top = rank::top_customers(&view, 5).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].customer_id, "C1");
    assert_eq!(top[0].segment, "Regular");
    assert_eq!(top[0].revenue, 20.0);
}
