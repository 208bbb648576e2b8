use chrono::FixedOffset;
use indexmap::IndexMap;

use report2sql::filter;
use report2sql::prelude::*;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn compile(filters: IndexMap<String, Filter>) -> Vec<String> {
    filter::conditions(&filters, utc()).unwrap()
}

fn one(key: &str, filter: Filter) -> IndexMap<String, Filter> {
    let mut filters = IndexMap::new();
    filters.insert(key.to_string(), filter);
    filters
}

#[test]
fn test_set_filter_from_api_json() {
    let filter: Filter = serde_json::from_str(
        r#"{"value":["Pending","Shipped"],"type":"set","meta":{"model_name":"TtSample","model_field":"status"}}"#,
    )
    .unwrap();
    assert_eq!(
        compile(one("status", filter)),
        vec![r#"TtSample.status IN ("Pending","Shipped")"#]
    );
}

#[test]
fn test_empty_set_emits_nothing() {
    let filter = Filter::new(FilterKind::Set, FilterValue::Many(vec![]))
        .with_meta("TtSample", "status");
    assert!(compile(one("status", filter)).is_empty());
}

#[test]
fn test_boolean_minus_one_emits_nothing() {
    let filter: Filter = serde_json::from_str(
        r#"{"value":-1,"type":"boolean","meta":{"model_name":"TtSample","model_field":"active"}}"#,
    )
    .unwrap();
    assert!(compile(one("active", filter)).is_empty());
}

#[test]
fn test_boolean_otherwise_behaves_as_exact() {
    let filter: Filter = serde_json::from_str(
        r#"{"value":1,"type":"boolean","meta":{"model_name":"TtSample","model_field":"active"}}"#,
    )
    .unwrap();
    assert_eq!(
        compile(one("active", filter)),
        vec![r#"TtSample.active = "1""#]
    );
}

#[test]
fn test_exact_quotes_the_value() {
    let filter = Filter::new(FilterKind::Exact, "Shipped".into())
        .with_meta("TtSample", "status");
    assert_eq!(
        compile(one("status", filter)),
        vec![r#"TtSample.status = "Shipped""#]
    );
}

#[test]
fn test_range_end_covers_whole_day() {
    let filter = Filter::new(FilterKind::Range, "".into())
        .with_meta("TtSample", "tagged_date")
        .with_bounds(None, Some(Scalar::Text("2016-01-27".into())));
    assert_eq!(
        compile(one("tagged_date", filter)),
        vec![r#"TtSample.tagged_date <= "2016-01-27 23:59:59""#]
    );
}

#[test]
fn test_range_with_only_start() {
    let filter = Filter::new(FilterKind::Range, "".into())
        .with_meta("TtSample", "tagged_date")
        .with_bounds(Some(Scalar::Text("2015-01-01".into())), None);
    assert_eq!(
        compile(one("tagged_date", filter)),
        vec![r#"TtSample.tagged_date >= "2015-01-01 00:00:00""#]
    );
}

#[test]
fn test_range_with_both_bounds_emits_two_fragments() {
    let filter = Filter::new(FilterKind::Range, "".into())
        .with_meta("TtSample", "tagged_date")
        .with_function("date")
        .with_bounds(
            Some(Scalar::Text("2015-01-01 03:00:00".into())),
            Some(Scalar::Text("2016-01-27 03:00:00".into())),
        );
    assert_eq!(
        compile(one("tagged_date", filter)),
        vec![
            r#"date(TtSample.tagged_date) >= "2015-01-01 03:00:00""#,
            r#"date(TtSample.tagged_date) <= "2016-01-28 02:59:59""#,
        ]
    );
}

#[test]
fn test_unparseable_bound_fails_the_build() {
    let filter = Filter::new(FilterKind::Range, "".into())
        .with_meta("TtSample", "tagged_date")
        .with_bounds(Some(Scalar::Text("soon".into())), None);
    let err = filter::conditions(&one("tagged_date", filter), utc()).unwrap_err();
    assert_eq!(err, BuildError::DateParse { value: "soon".into() });
}

#[test]
fn test_unsupported_kind_is_skipped_not_fatal() {
    let unknown: Filter = serde_json::from_str(
        r#"{"value":"x","type":"fuzzy","meta":{"model_name":"TtSample","model_field":"status"}}"#,
    )
    .unwrap();
    assert_eq!(unknown.kind, FilterKind::Other("fuzzy".into()));

    let mut filters = one("weird", unknown);
    filters.insert(
        "status".to_string(),
        Filter::new(FilterKind::Exact, "Pending".into()).with_meta("TtSample", "status"),
    );

    // The unsupported filter costs only its own predicate.
    assert_eq!(
        compile(filters),
        vec![r#"TtSample.status = "Pending""#]
    );
}

#[test]
fn test_fragments_follow_insertion_order() {
    let mut filters = IndexMap::new();
    filters.insert(
        "b".to_string(),
        Filter::new(FilterKind::Exact, "2".into()).with_meta("T", "b"),
    );
    filters.insert(
        "a".to_string(),
        Filter::new(FilterKind::Exact, "1".into()).with_meta("T", "a"),
    );
    assert_eq!(
        compile(filters),
        vec![r#"T.b = "2""#, r#"T.a = "1""#]
    );
}
