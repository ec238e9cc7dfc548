//! Embedded web dashboard for Martlens.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page sales dashboard with interactive filters
//! - JSON API endpoints for every report the CLI offers, plus CSV export
//!
//! Launched via `martlens serve` (default: `http://127.0.0.1:7878`).

mod api;
mod frontend;

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::schema::ReportConfig;
use crate::error::Error;

/// Runtime options for the dashboard server.
pub struct ServeOptions {
    pub addr: String,
    pub data: PathBuf,
    pub report: ReportConfig,
    pub open: bool,
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on the configured address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard). Each request reloads the sales data, so
/// a refreshed CSV shows up without restarting the server. Request errors
/// are answered per-request without crashing the server; malformed filter
/// parameters come back as 400, everything else as 500.
pub fn serve(opts: &ServeOptions) -> Result<()> {
    let server = Server::http(&opts.addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {}: {e}", opts.addr))?;

    println!("martlens dashboard running at http://{}", opts.addr);
    println!("Serving reports from {}", opts.data.display());
    println!("Press Ctrl+C to stop.\n");

    if opts.open {
        let url = format!("http://{}", opts.addr);
        let _ = open_browser(&url);
    }

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let result = dispatch(&method, &url, opts);

        match result {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                let status = match e.downcast_ref::<Error>() {
                    Some(Error::InvalidFilter(_)) => 400,
                    _ => 500,
                };
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                let resp = Response::from_data(body.as_bytes().to_vec())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(status));
                let _ = request.respond(resp);
            }
        }

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    method: &Method,
    url: &str,
    opts: &ServeOptions,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API — Reports
        (&Method::Get, "/api/summary") => api::get_summary(opts, url),
        (&Method::Get, "/api/revenue") => api::get_revenue(opts, url),
        (&Method::Get, "/api/trend") => api::get_trend(opts, url),
        (&Method::Get, "/api/top/products") => api::get_top_products(opts, url),
        (&Method::Get, "/api/top/customers") => api::get_top_customers(opts, url),
        (&Method::Get, "/api/channels") => api::get_channels(opts, url),
        (&Method::Get, "/api/sample") => api::get_sample(opts, url),

        // API — Filter catalog and export
        (&Method::Get, "/api/filters") => api::get_filters(opts),
        (&Method::Get, "/api/export") => api::get_export(opts, url),

        // API — Health
        (&Method::Get, "/api/health") => api::get_health(opts),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// CSV content type header, for the export endpoint.
pub(crate) fn content_type_csv() -> Header {
    Header::from_bytes("Content-Type", "text/csv; charset=utf-8").unwrap()
}

/// Download disposition header, so browsers save the export as a file.
pub(crate) fn csv_attachment() -> Header {
    Header::from_bytes(
        "Content-Disposition",
        "attachment; filename=\"martlens-export.csv\"",
    )
    .unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
