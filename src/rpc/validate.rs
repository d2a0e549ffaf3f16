//! Query Validator
//!
//! Pure parameter checks. Every accessor runs these before touching the
//! transport, so invalid input never produces a query.

use super::event_query::EventQuery;
use crate::error::ValidationError;
use crate::types::NATIVE_SYMBOL;
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound for `limit` / `per_page`
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Upper bound for a free-text search query, in bytes
pub const MAX_TX_SEARCH_QUERY_LEN: usize = 1024;

// 2-8 uppercase alphanumerics, "-", 3 character suffix (e.g. "BTCB-1DE").
// Only the native symbol goes without a suffix.
static SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z0-9]{2,8})-([A-Z0-9]{3})$").unwrap());

pub fn validate_offset(offset: i64) -> Result<(), ValidationError> {
    if offset < 0 {
        return Err(ValidationError::OffsetOutOfRange(offset));
    }
    Ok(())
}

pub fn validate_limit(limit: i64) -> Result<(), ValidationError> {
    if limit <= 0 || limit > MAX_PAGE_SIZE {
        return Err(ValidationError::LimitOutOfRange {
            limit,
            max: MAX_PAGE_SIZE,
        });
    }
    Ok(())
}

pub fn validate_page(page: i64) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::PageOutOfRange(page));
    }
    Ok(())
}

pub fn validate_symbol(symbol: &str) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::Symbol {
        symbol: symbol.to_string(),
        reason,
    };

    if symbol.is_empty() {
        return Err(invalid("symbol is empty"));
    }
    if symbol == NATIVE_SYMBOL {
        return Ok(());
    }

    let caps = SYMBOL_RE.captures(symbol).ok_or_else(|| {
        invalid("expected 2-8 uppercase alphanumerics and a 3 character suffix")
    })?;

    if &caps[1] == NATIVE_SYMBOL {
        return Err(invalid("native symbol cannot carry a suffix"));
    }
    Ok(())
}

/// `BASE_QUOTE`, both sides valid symbols
pub fn validate_pair(pair: &str) -> Result<(), ValidationError> {
    let mut parts = pair.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(base), Some(quote), None) => {
            validate_symbol(base)?;
            validate_symbol(quote)
        }
        _ => Err(ValidationError::PairFormat(pair.to_string())),
    }
}

pub fn validate_tx_search_query(query: &str) -> Result<(), ValidationError> {
    if query.len() > MAX_TX_SEARCH_QUERY_LEN {
        return Err(ValidationError::QueryTooLong {
            len: query.len(),
            max: MAX_TX_SEARCH_QUERY_LEN,
        });
    }
    EventQuery::parse(query)
        .map(|_| ())
        .map_err(|e| ValidationError::QuerySyntax(e.to_string()))
}
