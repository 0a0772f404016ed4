// ABOUTME: Request helpers shared by route handlers
// ABOUTME: JSON extraction with API-shaped errors, id parsing, booleans, and page links
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use axum::{extract::FromRequest, http::Uri};
use foodgram_core::{
    errors::{AppError, AppResult},
    pagination::{Page, PageRequest},
};
use url::form_urlencoded;

use crate::config::environment::PaginationConfig;

/// `Json` extractor whose rejections render as [`AppError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Parse a path id; anything that is not an integer cannot exist
///
/// # Errors
///
/// Returns `ResourceNotFound` naming `resource`
pub fn parse_id(raw: &str, resource: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::not_found(resource))
}

/// Parse `1`/`0`/`true`/`false` (case-insensitive); an empty value is unset
///
/// # Errors
///
/// Returns a field error on `field` for any other value
pub fn parse_bool(field: &str, raw: Option<&str>) -> AppResult<Option<bool>> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(Some(true)),
        "0" | "false" => Ok(Some(false)),
        _ => Err(AppError::field(field, "Must be one of 1, 0, true, false.")),
    }
}

/// Parse an optional non-negative integer parameter; garbage is ignored
#[must_use]
pub fn parse_u32(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// Resolve `page` and `limit` query values
///
/// A `page` that is not a positive integer is an invalid page.
///
/// # Errors
///
/// Returns `ResourceNotFound` ("Invalid page.") for a bad page number
pub fn page_request(
    page: Option<&str>,
    limit: Option<&str>,
    config: &PaginationConfig,
) -> AppResult<PageRequest> {
    let page = match page.map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<u32>().unwrap_or(0)),
    };
    PageRequest::resolve(page, parse_u32(limit), config.page_size, config.max_page_size)
}

/// Wrap one page of results with `next`/`previous` links built from the request URI
///
/// # Errors
///
/// Returns `ResourceNotFound` when the page lies past the end
pub fn paginate<T>(
    uri: &Uri,
    request: &PageRequest,
    count: u64,
    results: Vec<T>,
) -> AppResult<Page<T>> {
    request.ensure_in_range(count)?;
    let next = request
        .has_next(count)
        .then(|| page_link(uri, request.page + 1));
    let previous = request
        .has_previous()
        .then(|| page_link(uri, request.page - 1));
    Ok(Page::new(results, count, next, previous))
}

/// The request path with its `page` parameter replaced; page 1 drops the parameter
#[must_use]
pub fn page_link(uri: &Uri, page: u32) -> String {
    let query = uri.query().unwrap_or_default();
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key != "page" {
            serializer.append_pair(&key, &value);
        }
    }
    if page > 1 {
        serializer.append_pair("page", &page.to_string());
    }
    let query = serializer.finish();
    if query.is_empty() {
        uri.path().to_owned()
    } else {
        format!("{}?{query}", uri.path())
    }
}
