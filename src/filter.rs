//! Filter compilation - typed filter descriptors to SQL predicate fragments.
//!
//! Pure functions over the request's filter map. Structural date problems
//! abort the build; an unsupported filter kind only costs its own
//! predicate and leaves a diagnostic behind.

use chrono::FixedOffset;
use indexmap::IndexMap;

use crate::datetime;
use crate::error::BuildResult;
use crate::request::{Filter, FilterKind, FilterMeta, Scalar};
use crate::sql::{Token, TokenStream};

/// Compile the filter map into predicate fragments, in insertion order.
///
/// Each fragment is a complete boolean expression without its `AND (...)`
/// wrapper; the assembler adds that. Filters without `meta`, boolean
/// filters carrying the -1 sentinel, empty sets and unsupported kinds
/// contribute nothing.
pub fn conditions(
    filters: &IndexMap<String, Filter>,
    timezone: FixedOffset,
) -> BuildResult<Vec<String>> {
    let mut conditions = Vec::new();

    for (key, filter) in filters {
        let Some(meta) = &filter.meta else {
            continue;
        };
        let lhs = lhs_tokens(meta);

        match &filter.kind {
            FilterKind::Contains => {
                if let Some(scalar) = filter.value.scalar() {
                    let pattern = format!("%{}%", scalar.to_text());
                    conditions.push(comparison(&lhs, Token::Like, pattern));
                } else {
                    skip(key, "contains", "expected a scalar value");
                }
            }

            FilterKind::Boolean => match filter.value.scalar() {
                // -1 represents "all", so no condition is added
                Some(scalar) if scalar.is_minus_one() => {}
                Some(scalar) => {
                    conditions.push(comparison(&lhs, Token::Eq, scalar.to_text()));
                }
                None => skip(key, "boolean", "expected a scalar value"),
            },

            FilterKind::Exact => {
                if let Some(scalar) = filter.value.scalar() {
                    conditions.push(comparison(&lhs, Token::Eq, scalar.to_text()));
                } else {
                    skip(key, "exact", "expected a scalar value");
                }
            }

            FilterKind::Set => {
                if !filter.value.is_empty() {
                    conditions.push(membership(&lhs, filter.value.items()));
                }
            }

            FilterKind::Range => {
                if let Some(start) = &filter.start {
                    let bound = datetime::range_start(start, timezone)?;
                    conditions.push(comparison(&lhs, Token::Gte, bound));
                }
                if let Some(end) = &filter.end {
                    let bound = datetime::range_end(end, timezone)?;
                    conditions.push(comparison(&lhs, Token::Lte, bound));
                }
            }

            FilterKind::Other(kind) => skip(key, kind, "unsupported filter type"),
        }
    }

    Ok(conditions)
}

/// The predicate's left-hand side: `model.field`, optionally wrapped in a
/// SQL function.
fn lhs_tokens(meta: &FilterMeta) -> TokenStream {
    let column = Token::Column {
        table: meta.model_name.clone(),
        column: meta.model_field.clone(),
    };

    let mut ts = TokenStream::new();
    match meta.function.as_deref() {
        Some(function) if !function.is_empty() => {
            ts.push(Token::FunctionName(function.to_string()))
                .lparen()
                .push(column)
                .rparen();
        }
        _ => {
            ts.push(column);
        }
    }
    ts
}

fn comparison(lhs: &TokenStream, op: Token, rhs: String) -> String {
    let mut ts = TokenStream::new();
    ts.append(lhs)
        .space()
        .push(op)
        .space()
        .push(Token::LitString(rhs));
    ts.serialize()
}

fn membership(lhs: &TokenStream, values: &[Scalar]) -> String {
    let mut ts = TokenStream::new();
    ts.append(lhs).space().push(Token::In).space().lparen();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            ts.comma();
        }
        ts.push(Token::LitString(value.to_text()));
    }
    ts.rparen();
    ts.serialize()
}

fn skip(key: &str, kind: &str, reason: &str) {
    tracing::debug!(filter = %key, kind = %kind, "{}, no condition added", reason);
}
