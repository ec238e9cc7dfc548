//! CSV loading and normalization.
//!
//! Reads the transaction file into [`RawRecord`]s, then normalizes into the
//! canonical [`SalesTable`]:
//! - strict `%Y-%m-%d` date parsing
//! - channel validated against the closed enum
//! - `line_revenue` and `day_of_week` derived per row
//! - store_id → store_location consistency enforced
//!
//! The first malformed row aborts the load; there is no row skipping. The
//! same module owns the export writer so the round trip stays in one place.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::data::schema::{COLUMNS, Channel, RawRecord, SalesTable, Transaction};
use crate::error::{Error, Result};

/// Date format used by the source file, filter bounds, and the export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and normalize a transaction file.
///
/// An absent/unopenable file is `MissingData`; anything wrong inside the
/// file is `Schema` with a 1-based data row number.
pub fn load(path: &Path) -> Result<SalesTable> {
    let file = File::open(path).map_err(|e| Error::MissingData {
        path: path.to_path_buf(),
        source: e,
    })?;
    from_reader(file)
}

/// Normalize transaction CSV from any reader. Header row required.
pub fn from_reader<R: Read>(reader: R) -> Result<SalesTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let record = result.map_err(|e| Error::schema_at(i + 1, e.to_string()))?;
        records.push(record);
    }
    normalize(records)
}

/// Build the canonical table from raw records.
pub fn normalize(records: Vec<RawRecord>) -> Result<SalesTable> {
    let mut rows = Vec::with_capacity(records.len());
    let mut stores: BTreeMap<String, String> = BTreeMap::new();

    for (i, raw) in records.into_iter().enumerate() {
        let row_no = i + 1;

        let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT).map_err(|_| {
            Error::schema_at(row_no, format!("unparseable date {:?}", raw.date))
        })?;

        let channel = Channel::parse(&raw.channel).ok_or_else(|| {
            Error::schema_at(
                row_no,
                format!(
                    "unknown channel {:?} (expected \"In-store\" or \"Online\")",
                    raw.channel
                ),
            )
        })?;

        match stores.get(&raw.store_id) {
            Some(known) if known != &raw.store_location => {
                return Err(Error::schema_at(
                    row_no,
                    format!(
                        "store {} maps to {:?} but earlier rows say {:?}",
                        raw.store_id, raw.store_location, known
                    ),
                ));
            }
            Some(_) => {}
            None => {
                stores.insert(raw.store_id.clone(), raw.store_location.clone());
            }
        }

        let line_revenue = f64::from(raw.quantity) * raw.unit_price - raw.discount_applied;

        rows.push(Transaction {
            transaction_id: raw.transaction_id,
            date,
            store_id: raw.store_id,
            store_location: raw.store_location,
            channel,
            product_id: raw.product_id,
            product_name: raw.product_name,
            product_category: raw.product_category,
            quantity: raw.quantity,
            unit_price: raw.unit_price,
            discount_applied: raw.discount_applied,
            customer_id: raw.customer_id,
            customer_segment: raw.customer_segment,
            payment_method: raw.payment_method,
            line_revenue,
            day_of_week: date.weekday(),
        });
    }

    Ok(SalesTable::new(rows, stores))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Serialize rows back to the source format: same columns, same order,
/// ISO dates, full-precision numbers. The header is always written, even
/// for an empty selection.
pub fn to_csv<'a, I>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row.to_raw())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const SAMPLE_CSV: &str = "\
transaction_id,date,store_id,store_location,channel,product_id,product_name,product_category,quantity,unit_price,discount_applied,customer_id,customer_segment,payment_method
T0001,2024-01-01,S1,Downtown,In-store,P10,Espresso Beans,Groceries,2,10.00,0.00,C1,Regular,Cash
T0002,2024-01-02,S2,Riverside,Online,P20,\"Mixer, Stand\",Appliances,1,50.00,5.00,C2,Premium,Credit Card
T0003,2024-01-03,S1,Downtown,Online,P11,Filter Papers,Groceries,3,5.00,0.00,C1,Regular,Cash
";

    #[test]
    fn test_load_sample() {
        let table = from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.store_directory().len(), 2);
        assert_eq!(table.store_directory()["S1"], "Downtown");
        assert_eq!(table.categories(), vec!["Appliances", "Groceries"]);
        assert_eq!(table.payment_methods(), vec!["Cash", "Credit Card"]);
        assert_eq!(table.segments(), vec!["Premium", "Regular"]);
    }

    #[test]
    fn test_derives_line_revenue_and_weekday() {
        let table = from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let rows = table.rows();

        assert_eq!(rows[0].line_revenue, 20.0);
        assert_eq!(rows[1].line_revenue, 45.0);
        assert_eq!(rows[2].line_revenue, 15.0);

        // 2024-01-01 was a Monday
        assert_eq!(rows[0].day_of_week, Weekday::Mon);
        assert_eq!(rows[2].day_of_week, Weekday::Wed);
    }

    #[test]
    fn test_negative_line_revenue_propagates() {
        let csv = SAMPLE_CSV.replace("1,50.00,5.00", "1,50.00,80.00");
        let table = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[1].line_revenue, -30.0);
    }

    #[test]
    fn test_rejects_bad_date() {
        let csv = SAMPLE_CSV.replace("2024-01-02", "02/01/2024");
        let err = from_reader(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 2"), "unexpected message: {msg}");
        assert!(msg.contains("02/01/2024"));
    }

    #[test]
    fn test_rejects_unknown_channel() {
        let csv = SAMPLE_CSV.replace("Online,P20", "Curbside,P20");
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(err.to_string().contains("Curbside"));
    }

    #[test]
    fn test_rejects_unparseable_quantity() {
        let csv = SAMPLE_CSV.replace("Groceries,2,10.00", "Groceries,two,10.00");
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_rejects_inconsistent_store_mapping() {
        let csv = SAMPLE_CSV.replace("T0003,2024-01-03,S1,Downtown", "T0003,2024-01-03,S1,Uptown");
        let err = from_reader(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 3"), "unexpected message: {msg}");
        assert!(msg.contains("S1"));
    }

    #[test]
    fn test_missing_file() {
        let err = load(Path::new("/nonexistent/sales.csv")).unwrap_err();
        assert!(matches!(err, Error::MissingData { .. }));
    }

    #[test]
    fn test_header_only_is_valid_and_empty() {
        let header = SAMPLE_CSV.lines().next().unwrap();
        let table = from_reader(header.as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.date_range(), None);
    }

    #[test]
    fn test_round_trip() {
        let table = from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let exported = to_csv(table.rows().iter()).unwrap();
        let reloaded = from_reader(exported.as_bytes()).unwrap();
        assert_eq!(table, reloaded);
    }

    #[test]
    fn test_export_quotes_embedded_commas() {
        let table = from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let exported = to_csv(table.rows().iter()).unwrap();
        assert!(exported.contains("\"Mixer, Stand\""));
    }

    #[test]
    fn test_export_of_empty_selection_keeps_header() {
        let exported = to_csv(std::iter::empty()).unwrap();
        assert_eq!(exported.lines().count(), 1);
        assert!(exported.starts_with("transaction_id,date,"));
    }
}
