//! End-to-end scans over in-memory resources.

use abis_codec::CodecError;
use abis_ingest::Resource;
use abis_model::{ErrorKind, Field, Schema, Task, Value};
use abis_validate::checks::{LogicalOr, NotEmpty, SiteIdentifierMatch, Tabular};
use abis_validate::{
    Check, ValidateError, ValidationOptions, read_rows, validate_all, validate_resource,
};

fn make_schema(fields: Vec<Field>) -> Schema {
    Schema::new(fields).expect("schema")
}

fn make_resource(text: &str, schema: Schema) -> Resource {
    Resource::from_text("occurrences", "csv", text, schema).expect("resource")
}

fn scan(text: &str, schema: Schema, checks: Vec<Box<dyn Check>>) -> Task {
    validate_resource(make_resource(text, schema), checks, &ValidationOptions::default())
        .expect("scan")
}

fn kinds(task: &Task) -> Vec<ErrorKind> {
    task.errors.iter().map(|error| error.kind).collect()
}

#[test]
fn field_constraints_are_reported_per_cell() {
    let schema = make_schema(vec![
        Field::string("siteID").required().unique(),
        Field::new("individualCount", "integer"),
        Field::string("occurrenceStatus").with_enum(["present", "absent"]),
    ]);
    let text = "siteID,individualCount,occurrenceStatus\nS1,3,present\n,x,maybe\nS1,4,absent\n";
    let task = scan(text, schema, Vec::new());

    assert_eq!(
        kinds(&task),
        [ErrorKind::Constraint, ErrorKind::Type, ErrorKind::Constraint, ErrorKind::Unique]
    );
    let required = &task.errors[0];
    assert_eq!(required.row_number, Some(2));
    assert_eq!(required.field_number, Some(1));
    insta::assert_snapshot!(required.note.as_str(), @r#"constraint "required" is "true""#);

    let type_error = &task.errors[1];
    assert_eq!(type_error.field_name.as_deref(), Some("individualCount"));
    assert_eq!(type_error.cell.as_deref(), Some("x"));

    insta::assert_snapshot!(task.errors[2].note.as_str(), @r#"constraint "enum" is "present, absent""#);

    let unique = &task.errors[3];
    assert_eq!(unique.row_number, Some(3));
    insta::assert_snapshot!(unique.note.as_str(), @"the same as in the row at position 1");
    insta::assert_snapshot!(unique.message(), @r#"Row at position 3 has unique constraint violation in field "siteID" at position 1: the same as in the row at position 1"#);
}

#[test]
fn length_constraints() {
    let schema = make_schema(vec![Field::string("code").with_length(Some(2), Some(3))]);
    let task = scan("code\nAB\nA\nABCD\n", schema, Vec::new());
    let notes: Vec<&str> = task.errors.iter().map(|error| error.note.as_str()).collect();
    assert_eq!(
        notes,
        [r#"constraint "minLength" is "2""#, r#"constraint "maxLength" is "3""#]
    );
}

#[test]
fn short_and_long_rows() {
    let schema = make_schema(vec![Field::string("a"), Field::string("b")]);
    let task = scan("a,b\n1\n1,2,3\n", schema, Vec::new());

    assert_eq!(kinds(&task), [ErrorKind::MissingCell, ErrorKind::ExtraCell]);
    let missing = &task.errors[0];
    assert_eq!((missing.row_number, missing.field_number), (Some(1), Some(2)));
    assert_eq!(missing.field_name.as_deref(), Some("b"));
    let extra = &task.errors[1];
    assert_eq!((extra.row_number, extra.field_number), (Some(2), Some(3)));
    assert_eq!(extra.cell.as_deref(), Some("3"));
}

#[test]
fn missing_cells_skip_field_constraints() {
    let schema = make_schema(vec![Field::string("a"), Field::string("b").required()]);
    let task = scan("a,b\n1\n", schema, Vec::new());
    assert_eq!(kinds(&task), [ErrorKind::MissingCell]);
}

#[test]
fn columns_missing_from_the_header_read_as_null() {
    let schema = make_schema(vec![
        Field::string("siteID"),
        Field::string("siteName").required(),
    ]);
    let task = scan("siteID\nS1\nS2\n", schema, Vec::new());
    assert_eq!(kinds(&task), [ErrorKind::Constraint, ErrorKind::Constraint]);
    assert!(task.errors.iter().all(|error| error.field_name.as_deref() == Some("siteName")));
}

#[test]
fn header_order_may_differ_from_schema() {
    let schema = make_schema(vec![Field::string("a"), Field::new("b", "integer")]);
    let rows = read_rows(make_resource("b,a,extra\n7,x,ignored\n", schema)).expect("rows");
    assert_eq!(rows[0].get("a"), &Value::from("x"));
    assert_eq!(rows[0].get("b"), &Value::Integer(7));
    assert!(!rows[0].contains_field("extra"));
}

#[test]
fn custom_missing_values_become_null() {
    let schema = make_schema(vec![Field::new("count", "integer").required()])
        .with_missing_values(["", "NA"]);
    let task = scan("count\nNA\n5\n", schema, Vec::new());
    assert_eq!(kinds(&task), [ErrorKind::Constraint]);
    assert_eq!(task.errors[0].cell.as_deref(), Some("NA"));
}

#[test]
fn logical_or_scenario_flags_only_the_all_null_row() {
    let schema = make_schema(vec![Field::string("a"), Field::string("b"), Field::string("c")]);
    let text = "a,b,c\n1,2,3\n1,2,\n1,,3\n1,,\n,2,3\n,2,\n,,3\n,,\n";
    let checks: Vec<Box<dyn Check>> = vec![Box::new(LogicalOr::new(["a", "b", "c"]))];
    let task = scan(text, schema, checks);

    assert_eq!(task.stats.rows, 8);
    assert_eq!(task.error_count(), 1);
    assert_eq!(task.errors[0].row_number, Some(8));
    assert_eq!(task.errors[0].check.as_deref(), Some("logical-or"));
}

#[test]
fn site_identifier_match_end_to_end() {
    let schema = make_schema(vec![Field::string("siteVisitID"), Field::string("siteID")]);
    let sites = std::sync::Arc::new(std::collections::BTreeMap::from([("V1".to_string(), None)]));
    let checks: Vec<Box<dyn Check>> = vec![Box::new(SiteIdentifierMatch::new(
        "siteVisitID",
        "site visit data",
        sites,
    ))];
    let task = scan("siteVisitID,siteID\nV1,S1\nV2,S1\n", schema, checks);

    assert_eq!(kinds(&task), [ErrorKind::Constraint]);
    assert_eq!(task.errors[0].row_number, Some(2));
    assert!(task.errors[0].note.contains("site visit data"));
}

#[test]
fn non_tabular_resource_stops_after_start_hooks() {
    let schema = make_schema(vec![Field::string("a")]);
    let resource = Resource::from_text("notes", "json", "{\"a\": 1}", schema).expect("resource");
    let checks: Vec<Box<dyn Check>> = vec![Box::new(Tabular::new()), Box::new(NotEmpty::new())];
    let task = validate_resource(resource, checks, &ValidationOptions::default()).expect("scan");

    assert_eq!(kinds(&task), [ErrorKind::Source]);
    assert_eq!(task.errors[0].check.as_deref(), Some("tabular"));
    assert_eq!(task.stats.rows, 0);
    assert!(!task.valid());
}

#[test]
fn empty_csv_is_not_tabular() {
    let schema = make_schema(vec![Field::string("a")]);
    let checks: Vec<Box<dyn Check>> = vec![Box::new(Tabular::new())];
    let task = scan("", schema, checks);
    assert_eq!(kinds(&task), [ErrorKind::Source]);
}

#[test]
fn unreadable_record_keeps_earlier_errors() {
    let schema = make_schema(vec![Field::string("id").required()]);
    let bytes = b"id\n\"\"\n\xff\xfe\nC\n".to_vec();
    let resource =
        Resource::from_reader("occurrences", "csv", std::io::Cursor::new(bytes), schema)
            .expect("resource");
    let checks: Vec<Box<dyn Check>> = vec![Box::new(Tabular::new())];
    let task = validate_resource(resource, checks, &ValidationOptions::default()).expect("scan");

    assert_eq!(kinds(&task), [ErrorKind::Constraint, ErrorKind::Source]);
    assert_eq!(task.errors[0].row_number, Some(1));
    let unreadable = &task.errors[1];
    assert_eq!(unreadable.row_number, Some(2));
    assert_eq!(unreadable.check, None);
    assert!(unreadable.note.starts_with("the row could not be read"));
    assert!(unreadable.note.to_lowercase().contains("utf-8"));
    assert_eq!(task.stats.rows, 1);
    assert!(!task.valid());
}

#[test]
fn header_only_resource_fails_not_empty() {
    let schema = make_schema(vec![Field::string("a")]);
    let checks: Vec<Box<dyn Check>> = vec![Box::new(Tabular::new()), Box::new(NotEmpty::new())];
    let task = scan("a\n", schema, checks);
    assert_eq!(kinds(&task), [ErrorKind::TableDimensions]);
    assert_eq!(task.errors[0].check.as_deref(), Some("not-empty"));
}

#[test]
fn cell_errors_precede_check_errors() {
    let schema = make_schema(vec![Field::new("a", "integer"), Field::string("b")]);
    let checks: Vec<Box<dyn Check>> = vec![
        Box::new(LogicalOr::new(["a", "b"])),
        Box::new(NotEmpty::new()),
    ];
    let task = scan("a,b\nx,\n", schema, checks);

    assert_eq!(kinds(&task), [ErrorKind::Type, ErrorKind::RowConstraint]);
    assert_eq!(task.errors[0].check, None);
    assert_eq!(task.errors[1].check.as_deref(), Some("logical-or"));
    assert_eq!(task.stats.fields, 2);
}

#[test]
fn options_skip_and_limit() {
    let schema = || make_schema(vec![Field::string("a").required()]);
    // Quoted empty cells; blank lines are not records.
    let rows = "a\n\"\"\n\"\"\n\"\"\n";

    let skip = ValidationOptions::new().with_skip_errors([ErrorKind::Constraint]);
    let task = validate_resource(make_resource(rows, schema()), Vec::new(), &skip).expect("scan");
    assert!(task.valid());
    assert_eq!(task.stats.rows, 3);

    let limit = ValidationOptions::new().with_limit_errors(2);
    let task = validate_resource(make_resource(rows, schema()), Vec::new(), &limit).expect("scan");
    assert_eq!(task.error_count(), 2);
    assert_eq!(task.stats.rows, 3);

    let first_row = ValidationOptions::new().with_limit_rows(1);
    let task =
        validate_resource(make_resource(rows, schema()), Vec::new(), &first_row).expect("scan");
    assert_eq!(task.error_count(), 1);
    assert_eq!(task.stats.rows, 1);
}

#[test]
fn options_deserialize_from_json() {
    let options: ValidationOptions = serde_json::from_value(serde_json::json!({
        "skip_errors": ["type-error"],
        "limit_rows": 10
    }))
    .expect("options");
    assert!(options.skip_errors.contains(&ErrorKind::Type));
    assert_eq!(options.limit_rows, Some(10));
    assert_eq!(options.limit_errors, None);
}

#[test]
fn unknown_field_type_fails_the_scan() {
    let schema = make_schema(vec![Field::new("colour", "rgb")]);
    let result = validate_resource(
        make_resource("colour\nred\n", schema),
        Vec::new(),
        &ValidationOptions::default(),
    );
    assert!(matches!(
        result,
        Err(ValidateError::Codec(CodecError::UnknownType { .. }))
    ));
}

#[test]
fn validate_all_keeps_resource_order() {
    let schema = || make_schema(vec![Field::string("a").required()]);
    let runs = vec![
        (
            Resource::from_text("first", "csv", "a\n1\n", schema()).expect("resource"),
            Vec::new(),
        ),
        (
            Resource::from_text("second", "csv", "a\n\"\"\n", schema()).expect("resource"),
            Vec::new(),
        ),
    ];
    let report = validate_all(runs, &ValidationOptions::default()).expect("report");

    let names: Vec<&str> = report.tasks.iter().map(|task| task.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    assert!(report.task("first").is_some_and(Task::valid));
    assert!(!report.valid());
    assert_eq!(report.error_count(), 1);
}

#[test]
fn stateful_checks_start_empty_for_each_resource() {
    use abis_validate::checks::UniqueTogether;

    let schema = || make_schema(vec![Field::string("a")]);
    let build = || -> Vec<Box<dyn Check>> { vec![Box::new(UniqueTogether::new(["a"]))] };
    let first = scan("a\nx\n", schema(), build());
    let second = scan("a\nx\n", schema(), build());
    assert!(first.valid());
    assert!(second.valid());
}
