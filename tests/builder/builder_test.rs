use report2sql::prelude::*;

/// A mapping document for a sample-tracking schema: samples hang off the
/// default datum table, users hang off samples, and the copy table's user
/// column is displayed through a secondary join.
const MAPPING: &str = r#"{
    "fields": {
        "TtSampleDatum.upc": {
            "label": "UPC", "type": "varchar",
            "join": "TtSampleDatum", "field": "upc", "alias": "TtSampleDatum_upc"
        },
        "TtSample.status": {
            "label": "Status", "type": "varchar",
            "join": "TtSample", "field": "status", "alias": "TtSample_status"
        },
        "TtSample.tagged_date": {
            "label": "Tagged", "type": "datetime",
            "join": "TtSample", "field": "tagged_date", "alias": "TtSample_tagged_date"
        },
        "AmUser.username": {
            "label": "User", "type": "varchar",
            "join": "AmUser", "field": "username", "alias": "AmUser_username"
        },
        "TtSampleDatumCopy.am_user_id": {
            "label": "Copy Performed by", "type": "varchar",
            "join": "TtSampleDatumCopy", "field": "am_user_id",
            "alias": "TtSampleDatumCopy_am_user_id",
            "rel_join": {
                "type": "LEFT", "table": "am_users", "alias": "AmUserCopyPerformedBy",
                "on": "id", "display": "username"
            }
        },
        "TtSampleDatum.audit_note": {
            "label": "Audit note", "type": "varchar",
            "join": {
                "type": "INNER", "table": "tt_sample_audits", "alias": "TtSampleAudit",
                "on": "item_id", "model": "TtSampleDatum", "field": "base_item_id"
            },
            "field": "note", "alias": "TtSampleDatum_audit_note"
        },
        "TtSample.broken": {
            "label": "Broken", "field": "broken", "alias": "TtSample_broken"
        }
    },
    "joins": {
        "TtSampleDatum": {
            "type": "LEFT", "table": "tt_sample_data", "alias": "TtSampleDatum",
            "on": "id", "model": "TtSampleDatum", "field": "id"
        },
        "TtSample": {
            "type": "LEFT", "table": "tt_samples", "alias": "TtSample",
            "on": "id", "model": "TtSampleDatum", "field": "sample_id"
        },
        "TtSampleDatumCopy": {
            "type": "LEFT", "table": "tt_sample_datum_copies", "alias": "TtSampleDatumCopy",
            "on": "datum_base_item_id", "model": "TtSampleDatum", "field": "base_item_id"
        },
        "AmUser": {
            "type": "LEFT", "table": "am_users", "alias": "AmUser",
            "on": "id", "model": "TtSample", "field": "am_user_id"
        }
    }
}"#;

fn builder() -> QueryBuilder {
    let mapping = MappingDocument::from_json_str(MAPPING).unwrap();
    QueryBuilder::new(mapping, "tt_sample_data", "TtSampleDatum")
}

#[test]
fn test_single_field_on_default_table() {
    let sql = builder()
        .build(&ReportRequest::new(vec!["TtSampleDatum.upc"]))
        .unwrap();
    assert_eq!(
        sql,
        "SELECT TtSampleDatum.upc AS TtSampleDatum_upc \
         FROM tt_sample_data TtSampleDatum WHERE (1=1)"
    );
}

#[test]
fn test_shared_join_appears_once() {
    let sql = builder()
        .build(&ReportRequest::new(vec![
            "TtSample.status",
            "TtSample.tagged_date",
        ]))
        .unwrap();
    assert_eq!(sql.matches("LEFT JOIN tt_samples").count(), 1);
    assert_eq!(
        sql,
        "SELECT TtSample.status AS TtSample_status, \
         TtSample.tagged_date AS TtSample_tagged_date \
         FROM tt_sample_data TtSampleDatum \
         LEFT JOIN tt_samples TtSample ON TtSampleDatum.sample_id = TtSample.id \
         WHERE (1=1)"
    );
}

#[test]
fn test_transitive_joins_in_dependency_order() {
    // AmUser depends on TtSample, which depends on the default table;
    // requesting only the user column must pull in both, parents first.
    let sql = builder()
        .build(&ReportRequest::new(vec!["AmUser.username"]))
        .unwrap();
    let samples = sql.find("JOIN tt_samples").unwrap();
    let users = sql.find("JOIN am_users").unwrap();
    assert!(samples < users);
    assert_eq!(
        sql,
        "SELECT AmUser.username AS AmUser_username \
         FROM tt_sample_data TtSampleDatum \
         LEFT JOIN tt_samples TtSample ON TtSampleDatum.sample_id = TtSample.id \
         LEFT JOIN am_users AmUser ON TtSample.am_user_id = AmUser.id \
         WHERE (1=1)"
    );
}

#[test]
fn test_rel_join_projects_display_column() {
    let sql = builder()
        .build(&ReportRequest::new(vec![
            "TtSampleDatum.upc",
            "TtSampleDatumCopy.am_user_id",
        ]))
        .unwrap();
    assert_eq!(
        sql,
        "SELECT TtSampleDatum.upc AS TtSampleDatum_upc, \
         AmUserCopyPerformedBy.username AS TtSampleDatumCopy_am_user_id \
         FROM tt_sample_data TtSampleDatum \
         LEFT JOIN tt_sample_datum_copies TtSampleDatumCopy \
         ON TtSampleDatum.base_item_id = TtSampleDatumCopy.datum_base_item_id \
         LEFT JOIN am_users AmUserCopyPerformedBy \
         ON TtSampleDatumCopy.am_user_id = AmUserCopyPerformedBy.id \
         WHERE (1=1)"
    );
}

#[test]
fn test_inline_join_override() {
    let sql = builder()
        .build(&ReportRequest::new(vec!["TtSampleDatum.audit_note"]))
        .unwrap();
    assert_eq!(
        sql,
        "SELECT TtSampleAudit.note AS TtSampleDatum_audit_note \
         FROM tt_sample_data TtSampleDatum \
         INNER JOIN tt_sample_audits TtSampleAudit \
         ON TtSampleDatum.base_item_id = TtSampleAudit.item_id \
         WHERE (1=1)"
    );
}

#[test]
fn test_distinct() {
    let sql = builder()
        .with_distinct(true)
        .build(&ReportRequest::new(vec!["TtSample.status"]))
        .unwrap();
    assert!(sql.starts_with("SELECT DISTINCT TtSample.status"));
}

#[test]
fn test_filters_are_and_prefixed() {
    let request = ReportRequest::new(vec!["TtSampleDatum.upc", "TtSample.tagged_date"])
        .with_filter(
            "upc",
            Filter::new(FilterKind::Contains, "0890".into()).with_meta("TtSampleDatum", "upc"),
        )
        .with_filter(
            "tagged_date",
            Filter::new(FilterKind::Range, "2015-01-01 to 2016-01-27".into())
                .with_meta("TtSample", "tagged_date")
                .with_function("date")
                .with_bounds(
                    Some(Scalar::Text("2015-01-01 03:00:00".into())),
                    Some(Scalar::Text("2016-01-27 03:00:00".into())),
                ),
        );

    let sql = builder().build(&request).unwrap();
    insta::assert_snapshot!(sql, @r#"SELECT TtSampleDatum.upc AS TtSampleDatum_upc, TtSample.tagged_date AS TtSample_tagged_date FROM tt_sample_data TtSampleDatum LEFT JOIN tt_samples TtSample ON TtSampleDatum.sample_id = TtSample.id WHERE (1=1) AND (TtSampleDatum.upc LIKE "%0890%") AND (date(TtSample.tagged_date) >= "2015-01-01 03:00:00") AND (date(TtSample.tagged_date) <= "2016-01-28 02:59:59")"#);
}

#[test]
fn test_where_clause_is_valid_with_no_filters() {
    let sql = builder()
        .build(&ReportRequest::new(vec!["TtSampleDatum.upc"]))
        .unwrap();
    assert!(sql.ends_with("WHERE (1=1)"));
    assert!(!sql.contains("AND"));
}

#[test]
fn test_unmapped_field_aborts() {
    let err = builder()
        .build(&ReportRequest::new(vec!["Nope.nothing"]))
        .unwrap_err();
    assert_eq!(err, BuildError::UnmappedField("Nope.nothing".into()));
}

#[test]
fn test_empty_field_list_aborts() {
    let err = builder()
        .build(&ReportRequest::new(Vec::<String>::new()))
        .unwrap_err();
    assert!(matches!(err, BuildError::InvalidRequest(_)));
}

#[test]
fn test_field_without_join_settings_aborts() {
    let err = builder()
        .build(&ReportRequest::new(vec!["TtSample.broken"]))
        .unwrap_err();
    assert!(matches!(err, BuildError::IncompleteFieldMapping { .. }));
}

#[test]
fn test_builds_share_no_state() {
    let builder = builder();
    let request = ReportRequest::new(vec!["AmUser.username", "TtSample.status"]);
    let first = builder.build(&request).unwrap();
    let second = builder.build(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.matches("LEFT JOIN tt_samples").count(), 1);
}

#[test]
fn test_request_deserializes_with_filters_in_order() {
    let request: ReportRequest = serde_json::from_str(
        r#"{
            "fields": ["TtSampleDatum.upc", "TtSample.status"],
            "filters": {
                "status": {
                    "value": ["Pending", "Shipped"], "type": "set",
                    "meta": {"model_name": "TtSample", "model_field": "status"}
                },
                "upc": {
                    "value": "0890", "type": "contains",
                    "meta": {"model_name": "TtSampleDatum", "model_field": "upc"}
                }
            }
        }"#,
    )
    .unwrap();

    let sql = builder().build(&request).unwrap();
    let set = sql.find(r#"TtSample.status IN ("Pending","Shipped")"#).unwrap();
    let like = sql.find(r#"TtSampleDatum.upc LIKE "%0890%""#).unwrap();
    assert!(set < like);
}
