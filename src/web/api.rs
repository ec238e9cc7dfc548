//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Report endpoints take the
//! same filter parameters the CLI takes as flags: `from`, `to`, `stores`,
//! `channel`, `categories` (multi-select values comma-separated). A
//! malformed filter value surfaces as `InvalidFilter`, which the server
//! answers with a 400.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::aggregate::Dimension;
use crate::data::{self, Channel, DATE_FORMAT};
use crate::error::Error;
use crate::filter::FilterSpec;
use crate::report::{self, SampleRow};

use super::{ServeOptions, content_type_csv, content_type_json, csv_attachment};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Revenue breakdown response — one entry per group, display order.
#[derive(Serialize)]
struct RevenueResponse {
    dimension: &'static str,
    entries: Vec<RevenueEntry>,
}

#[derive(Serialize)]
struct RevenueEntry {
    key: String,
    revenue: f64,
}

/// Daily revenue response, chronological.
#[derive(Serialize)]
struct TrendResponse {
    entries: Vec<TrendEntry>,
}

#[derive(Serialize)]
struct TrendEntry {
    date: String,
    revenue: f64,
}

/// Product ranking response.
#[derive(Serialize)]
struct TopProductsResponse {
    entries: Vec<ProductEntry>,
}

#[derive(Serialize)]
struct ProductEntry {
    rank: usize,
    product: String,
    revenue: f64,
}

/// Customer ranking response.
#[derive(Serialize)]
struct TopCustomersResponse {
    entries: Vec<CustomerEntry>,
}

#[derive(Serialize)]
struct CustomerEntry {
    rank: usize,
    customer_id: String,
    segment: String,
    revenue: f64,
}

/// Channel count response, largest first.
#[derive(Serialize)]
struct ChannelsResponse {
    entries: Vec<ChannelEntry>,
}

#[derive(Serialize)]
struct ChannelEntry {
    channel: String,
    transactions: u64,
}

/// Sample response.
#[derive(Serialize)]
struct SampleResponse {
    rows: Vec<SampleRow>,
}

/// Filter catalog response — populates the dashboard filter bar.
#[derive(Serialize)]
struct FiltersResponse {
    stores: Vec<String>,
    categories: Vec<String>,
    channels: Vec<&'static str>,
    payment_methods: Vec<String>,
    segments: Vec<String>,
    date_min: Option<String>,
    date_max: Option<String>,
    currency: String,
}

/// Health response — data source status.
#[derive(Serialize)]
struct HealthResponse {
    data_path: String,
    data_ok: bool,
    rows: usize,
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Extract a query parameter, percent-decoded. Empty values count as absent.
fn query_param(url: &str, name: &str) -> Option<String> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == name && !v.is_empty() {
            Some(
                urlencoding::decode(v)
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| v.to_string()),
            )
        } else {
            None
        }
    })
}

/// Parse a comma-separated multi-select parameter.
fn list_param(url: &str, name: &str) -> Vec<String> {
    query_param(url, name)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a numeric parameter, falling back to a default.
fn usize_param(url: &str, name: &str, default: usize) -> usize {
    query_param(url, name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Build a `FilterSpec` from request query parameters.
fn filter_from_query(url: &str) -> Result<FilterSpec, Error> {
    let from = query_param(url, "from");
    let to = query_param(url, "to");
    let channel = query_param(url, "channel");
    FilterSpec::build(
        from.as_deref(),
        to.as_deref(),
        list_param(url, "stores"),
        channel.as_deref(),
        list_param(url, "categories"),
    )
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/summary` — KPI scalars for the filtered selection.
pub fn get_summary(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;
    let summary = report::summary(&table, &spec)?;

    json_response(&summary)
}

/// `GET /api/revenue?by=<dimension>` — revenue grouped by one dimension.
pub fn get_revenue(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let by = query_param(url, "by").unwrap_or_else(|| "category".to_string());
    let dim = Dimension::parse(&by).ok_or_else(|| {
        Error::InvalidFilter(format!(
            "unknown dimension {:?} (expected one of: {})",
            by,
            Dimension::ALL.map(|d| d.as_str()).join(", ")
        ))
    })?;

    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;
    let pairs = report::revenue_breakdown(&table, &spec, dim)?;

    let resp = RevenueResponse {
        dimension: dim.as_str(),
        entries: pairs
            .into_iter()
            .map(|(key, revenue)| RevenueEntry { key, revenue })
            .collect(),
    };

    json_response(&resp)
}

/// `GET /api/trend` — daily revenue, chronological.
pub fn get_trend(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;
    let pairs = report::revenue_breakdown(&table, &spec, Dimension::Date)?;

    let resp = TrendResponse {
        entries: pairs
            .into_iter()
            .map(|(date, revenue)| TrendEntry { date, revenue })
            .collect(),
    };

    json_response(&resp)
}

/// `GET /api/top/products?limit=N` — product ranking by revenue.
pub fn get_top_products(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let n = usize_param(url, "limit", opts.report.top_n);
    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;
    let entries = report::top_products(&table, &spec, n)?;

    let resp = TopProductsResponse {
        entries: entries
            .into_iter()
            .map(|e| ProductEntry {
                rank: e.rank,
                product: e.key,
                revenue: e.value,
            })
            .collect(),
    };

    json_response(&resp)
}

/// `GET /api/top/customers?limit=N` — customer ranking with segments.
pub fn get_top_customers(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let n = usize_param(url, "limit", opts.report.top_n);
    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;
    let entries = report::top_customers(&table, &spec, n)?;

    let resp = TopCustomersResponse {
        entries: entries
            .into_iter()
            .map(|e| CustomerEntry {
                rank: e.rank,
                customer_id: e.customer_id,
                segment: e.segment,
                revenue: e.revenue,
            })
            .collect(),
    };

    json_response(&resp)
}

/// `GET /api/channels` — transaction counts per channel.
pub fn get_channels(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;
    let counts = report::channel_counts(&table, &spec)?;

    let resp = ChannelsResponse {
        entries: counts
            .into_iter()
            .map(|(channel, transactions)| ChannelEntry {
                channel,
                transactions,
            })
            .collect(),
    };

    json_response(&resp)
}

/// `GET /api/sample?limit=N` — a readable sample of matching rows.
pub fn get_sample(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let rows = usize_param(url, "limit", opts.report.sample_rows);
    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;

    let resp = SampleResponse {
        rows: report::sample(&table, &spec, rows),
    };

    json_response(&resp)
}

/// `GET /api/filters` — values available for the dashboard filter bar.
pub fn get_filters(opts: &ServeOptions) -> Result<Response<Cursor<Vec<u8>>>> {
    let table = data::load(&opts.data)?;
    let range = table.date_range();

    let mut channels = vec!["All"];
    channels.extend(Channel::ALL.map(|c| c.as_str()));

    let resp = FiltersResponse {
        stores: table.locations(),
        categories: table.categories(),
        channels,
        payment_methods: table.payment_methods(),
        segments: table.segments(),
        date_min: range.map(|(min, _)| min.format(DATE_FORMAT).to_string()),
        date_max: range.map(|(_, max)| max.format(DATE_FORMAT).to_string()),
        currency: opts.report.currency.clone(),
    };

    json_response(&resp)
}

/// `GET /api/export` — filtered rows as CSV, ready to reload.
pub fn get_export(opts: &ServeOptions, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let spec = filter_from_query(url)?;
    let table = data::load(&opts.data)?;
    let csv = report::export(&table, &spec)?;

    Ok(Response::from_data(csv.into_bytes())
        .with_header(content_type_csv())
        .with_header(csv_attachment())
        .with_status_code(StatusCode(200)))
}

/// `GET /api/health` — data source status.
pub fn get_health(opts: &ServeOptions) -> Result<Response<Cursor<Vec<u8>>>> {
    let resp = match data::load(&opts.data) {
        Ok(table) => HealthResponse {
            data_path: opts.data.display().to_string(),
            data_ok: true,
            rows: table.len(),
            error: None,
        },
        Err(e) => HealthResponse {
            data_path: opts.data.display().to_string(),
            data_ok: false,
            rows: 0,
            error: Some(e.to_string()),
        },
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
