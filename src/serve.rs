//! HTTP endpoint for an interactive presentation layer
//!
//! `catalogdash serve titles.csv` → loads the catalog once, then answers
//! every request by filtering and aggregating from scratch.
//!
//! | Route | Returns |
//! |-------|---------|
//! | `GET /api/options` | distinct values per dimension (the default selection) |
//! | `GET /api/dashboard?type=..&country=..&genre=..` | summary + derived tables |
//! | `GET /api/export?...` | filtered rows as a CSV download |
//!
//! Query keys may repeat. A dimension whose key is absent accepts every
//! value; a key given only as `country=` accepts none.

use crate::aggregate::AggregateOptions;
use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::filter::{Dimension, FilterSelection};
use crate::report::{export, DashboardReport};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{info, warn};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, data: None, error: Some(message.into()) }
    }
}

/// Distinct values offered for each dimension
#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub countries: Vec<String>,
    pub genres: Vec<String>,
}

impl FilterOptions {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            types: catalog.distinct(Dimension::Type),
            countries: catalog.distinct(Dimension::Country),
            genres: catalog.distinct(Dimension::Genre),
        }
    }
}

/// A response ready to be written to the client
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Offer the body as a download with this filename
    pub attachment: Option<&'static str>,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Result<Self> {
        Ok(Self {
            status,
            content_type: "application/json",
            body: serde_json::to_vec(value)?,
            attachment: None,
        })
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain",
            body: b"Not found".to_vec(),
            attachment: None,
        }
    }
}

/// Load the catalog, then serve until the process is stopped
pub fn start<P: AsRef<Path>>(port: u16, path: P, options: AggregateOptions) -> Result<()> {
    let path = path.as_ref();
    let catalog = Catalog::load(path)?;

    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| {
        CatalogError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    })?;

    eprintln!("\n\x1b[1;32mcatalogdash\x1b[0m");
    eprintln!("   http://localhost:{}", port);
    eprintln!("   Serving: {} ({} records)\n", path.display(), catalog.len());

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &catalog, &options) {
            warn!(error = %e, "request failed");
        }
    }

    Ok(())
}

fn handle_request(request: Request, catalog: &Catalog, options: &AggregateOptions) -> Result<()> {
    let reply = route(request.method(), request.url(), catalog, options)?;
    info!(url = request.url(), status = reply.status, "request");

    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response.add_header(h);
    }
    if let Some(filename) = reply.attachment {
        let value = format!("attachment; filename=\"{}\"", filename);
        if let Ok(h) = Header::from_bytes(&b"Content-Disposition"[..], value.as_bytes()) {
            response.add_header(h);
        }
    }

    request.respond(response)?;
    Ok(())
}

/// Map a request line to a reply. Pure apart from the report timestamp.
pub fn route(method: &Method, url: &str, catalog: &Catalog, options: &AggregateOptions) -> Result<Reply> {
    let mut parts = url.splitn(2, '?');
    let path = parts.next().unwrap_or("/");
    let query = parts.next();

    if *method != Method::Get {
        return Ok(Reply::not_found());
    }

    match path {
        "/api/options" => Reply::json(200, &ApiResponse::success(FilterOptions::from_catalog(catalog))),

        "/api/dashboard" => match parse_selection(catalog, query) {
            Ok(selection) => {
                let report = DashboardReport::build(catalog, &selection, options);
                Reply::json(200, &ApiResponse::success(report))
            }
            Err(message) => Reply::json(400, &ApiResponse::failure(message)),
        },

        "/api/export" => match parse_selection(catalog, query) {
            Ok(selection) => {
                let view = catalog.filter(&selection);
                Ok(Reply {
                    status: 200,
                    content_type: "text/csv",
                    body: export::to_bytes(catalog.headers(), &view)?,
                    attachment: Some(export::DOWNLOAD_FILENAME),
                })
            }
            Err(message) => Reply::json(400, &ApiResponse::failure(message)),
        },

        _ => Ok(Reply::not_found()),
    }
}

/// Build a selection from query parameters, defaulting to everything.
fn parse_selection(catalog: &Catalog, query: Option<&str>) -> std::result::Result<FilterSelection, String> {
    let mut choices: HashMap<Dimension, Vec<String>> = HashMap::new();

    if let Some(query) = query {
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .map_err(|e| format!("invalid query string: {}", e))?;
        for (key, value) in pairs {
            match Dimension::from_key(&key) {
                Some(dimension) => choices.entry(dimension).or_default().push(value),
                None => return Err(format!("unknown filter '{}'", key)),
            }
        }
    }

    Ok(Dimension::ALL
        .iter()
        .fold(FilterSelection::all(catalog), |selection, d| {
            selection.restrict(*d, choices.remove(d))
        }))
}
