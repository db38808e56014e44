//! Row-level behavior and message wording of the built-in checks.

use std::collections::BTreeMap;
use std::sync::Arc;

use abis_model::{
    AllowedSet, DefaultMap, ErrorKind, Row, SiteIdentifier, SiteIdentifierMap, Value, Whitelist,
};
use abis_validate::checks::{
    BoundingBox, ChronologicalOrder, Coordinates, DefaultLookup, Gate, GeometryFields,
    IdentifierPresence, KeySource, LogicalOr, MutualExclusion, MutualInclusion, NotEmpty,
    NullHandling, Required, RowConstraint, SetMembership, SiteIdentifierFields,
    SiteIdentifierMatch, SitesGeometry, Tabular, UniqueTogether,
};
use abis_validate::{Check, ResourceInfo};
use serde_json::json;

fn make_row(number: usize, cells: &[(&str, Option<&str>)]) -> Row {
    Row::from_pairs(number, cells.iter().map(|(name, value)| (*name, Value::from(*value))))
}

fn make_set(values: &[&str]) -> Arc<AllowedSet> {
    Arc::new(values.iter().map(|value| value.to_string()).collect())
}

fn make_whitelist(field: &str, values: &[&str]) -> Whitelist {
    BTreeMap::from([(field.to_string(), make_set(values))])
}

#[test]
fn tabular_rejects_non_delimited_or_headerless_resources() {
    let mut check = Tabular::new();
    let table = ResourceInfo::new("sites", "csv").with_header(Some(vec!["siteID".to_string()]));
    assert!(check.validate_start(&table).is_empty());

    let json = ResourceInfo::new("sites", "json");
    let headerless = ResourceInfo::new("sites", "tsv");
    for info in [json, headerless] {
        let errors = check.validate_start(&info);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Source);
        insta::allow_duplicates! {
            insta::assert_snapshot!(errors[0].note.as_str(), @"the resource is not tabular");
        }
    }
}

#[test]
fn not_empty_requires_a_row() {
    let mut check = NotEmpty::new();
    let mut info = ResourceInfo::new("sites", "csv");
    let errors = check.validate_end(&info);
    assert_eq!(errors[0].kind, ErrorKind::TableDimensions);
    insta::assert_snapshot!(errors[0].note.as_str(), @"at least one row is required");

    info.row_count = 1;
    assert!(check.validate_end(&info).is_empty());
}

#[test]
fn coordinates_outside_every_box_fail() {
    let mut check = Coordinates::default();
    let missing = make_row(1, &[("decimalLatitude", None), ("decimalLongitude", Some("10"))]);
    assert!(check.validate_row(&missing).is_empty());

    let row = Row::from_pairs(
        2,
        [
            ("decimalLatitude", Value::Number(-35.28)),
            ("decimalLongitude", Value::Number(149.13)),
        ],
    );
    assert!(check.validate_row(&row).is_empty());

    let row = Row::from_pairs(
        3,
        [
            ("decimalLatitude", Value::Number(-10.0)),
            ("decimalLongitude", Value::Number(10.0)),
        ],
    );
    let errors = check.validate_row(&row);
    assert_eq!(errors[0].kind, ErrorKind::RowConstraint);
    assert_eq!(errors[0].row_number, Some(3));
    insta::assert_snapshot!(errors[0].note.as_str(), @"coordinates (-10, 10) are not within any permitted area");
}

#[test]
fn coordinates_accept_territories_and_custom_boxes() {
    let mut check = Coordinates::default();
    let christmas_island = Row::from_pairs(
        1,
        [
            ("decimalLatitude", Value::Number(-10.49)),
            ("decimalLongitude", Value::Number(105.62)),
        ],
    );
    assert!(check.validate_row(&christmas_island).is_empty());

    let adelie_land = Row::from_pairs(
        2,
        [
            ("decimalLatitude", Value::Number(-67.0)),
            ("decimalLongitude", Value::Number(139.0)),
        ],
    );
    assert_eq!(check.validate_row(&adelie_land).len(), 1);

    let mut custom = Coordinates::new("lat", "lon")
        .with_bounding_boxes(vec![BoundingBox::new("plot", (0.0, 1.0), (0.0, 1.0))]);
    let row = Row::from_pairs(3, [("lat", Value::Number(0.5)), ("lon", Value::Integer(1))]);
    assert!(custom.validate_row(&row).is_empty());
}

#[test]
fn logical_or_needs_one_field_unless_whitelisted() {
    let mut check = LogicalOr::new(["scientificName", "vernacularName"])
        .with_whitelist(make_whitelist("basisOfRecord", &["HumanObservation"]));

    let row = make_row(1, &[("scientificName", None), ("vernacularName", Some("koala"))]);
    assert!(check.validate_row(&row).is_empty());

    let escaped = make_row(
        2,
        &[
            ("scientificName", None),
            ("vernacularName", None),
            ("basisOfRecord", Some("HumanObservation")),
        ],
    );
    assert!(check.validate_row(&escaped).is_empty());

    let row = make_row(
        3,
        &[
            ("scientificName", None),
            ("vernacularName", None),
            ("basisOfRecord", Some("PreservedSpecimen")),
        ],
    );
    let errors = check.validate_row(&row);
    insta::assert_snapshot!(errors[0].note.as_str(), @"one or more of the fields scientificName, vernacularName must be provided");
}

#[test]
fn mutual_inclusion_names_the_missing_fields() {
    let mut check = MutualInclusion::new(["organismQuantity", "organismQuantityType"]);
    assert!(check.validate_row(&make_row(1, &[])).is_empty());

    let row = make_row(
        2,
        &[("organismQuantity", Some("3")), ("organismQuantityType", None)],
    );
    let errors = check.validate_row(&row);
    assert_eq!(errors[0].kind, ErrorKind::RowConstraint);
    insta::assert_snapshot!(errors[0].note.as_str(), @"the fields organismQuantity, organismQuantityType must be provided together (missing: organismQuantityType)");

    let mut whitelisted = MutualInclusion::new(["organismQuantity", "organismQuantityType"])
        .with_whitelist(make_whitelist("occurrenceStatus", &["absent"]));
    let row = make_row(
        3,
        &[("organismQuantity", Some("0")), ("occurrenceStatus", Some("absent"))],
    );
    assert!(whitelisted.validate_row(&row).is_empty());
}

#[test]
fn mutual_exclusion_with_and_without_or_behavior() {
    let mut check = MutualExclusion::new(["a", "b"]);
    assert!(check.validate_row(&make_row(1, &[("a", None), ("b", None)])).is_empty());
    assert!(check.validate_row(&make_row(2, &[("a", Some("x")), ("b", None)])).is_empty());
    let errors = check.validate_row(&make_row(3, &[("a", Some("x")), ("b", Some("y"))]));
    insta::assert_snapshot!(errors[0].note.as_str(), @"the fields a, b are mutually exclusive (provided: a, b)");

    let mut exactly_one = MutualExclusion::new(["a", "b"]).with_or_behavior(true);
    let errors = exactly_one.validate_row(&make_row(4, &[("a", None), ("b", None)]));
    insta::assert_snapshot!(errors[0].note.as_str(), @"exactly one of the fields a, b must be provided");
}

#[test]
fn required_reports_unknown_whitelist_fields_on_every_row() {
    let mut check =
        Required::new(["siteID"]).with_whitelist(make_whitelist("samplingProtocol", &["opportunistic"]));

    for number in 1..=2 {
        let errors = check.validate_row(&make_row(number, &[("siteID", None)]));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ErrorKind::Check);
        assert_eq!(errors[0].row_number, Some(number));
        insta::allow_duplicates! {
            insta::assert_snapshot!(errors[0].note.as_str(), @r#"whitelist field "samplingProtocol" does not exist in the resource"#);
        }
        assert_eq!(errors[1].kind, ErrorKind::RowConstraint);
    }

    let row = make_row(3, &[("siteID", None), ("samplingProtocol", Some("opportunistic"))]);
    assert!(check.validate_row(&row).is_empty());
}

#[test]
fn default_lookup_messages() {
    let defaults: DefaultMap = BTreeMap::from([("S1".to_string(), "WGS84".to_string())]);
    let mut check = DefaultLookup::new(
        KeySource::Field("siteID".to_string()),
        "geodeticDatum",
        Arc::new(defaults),
    );

    let row = make_row(1, &[("siteID", Some("S1")), ("geodeticDatum", None)]);
    assert!(check.validate_row(&row).is_empty());
    let row = make_row(2, &[("siteID", Some("S9")), ("geodeticDatum", Some("GDA94"))]);
    assert!(check.validate_row(&row).is_empty());

    let row = make_row(3, &[("siteID", None), ("geodeticDatum", None)]);
    let errors = check.validate_row(&row);
    assert_eq!(errors[0].kind, ErrorKind::RowConstraint);
    insta::assert_snapshot!(errors[0].note.as_str(), @"geodeticDatum must be provided when siteID is not provided");

    let row = make_row(4, &[("siteID", Some("S9")), ("geodeticDatum", None)]);
    let errors = check.validate_row(&row);
    insta::assert_snapshot!(errors[0].note.as_str(), @r#"geodeticDatum must be provided because no default exists for siteID "S9""#);
}

#[test]
fn default_lookup_composite_and_computed_keys() {
    let defaults: DefaultMap = BTreeMap::from([("S1|V1".to_string(), "2021-01-01".to_string())]);
    let defaults = Arc::new(defaults);
    let mut composite = DefaultLookup::new(
        KeySource::Composite(vec!["siteID".to_string(), "siteVisitID".to_string()]),
        "eventDate",
        Arc::clone(&defaults),
    );
    let row = make_row(
        1,
        &[("siteID", Some("S1")), ("siteVisitID", Some("V1")), ("eventDate", None)],
    );
    assert!(composite.validate_row(&row).is_empty());
    let row = make_row(
        2,
        &[("siteID", Some("S1")), ("siteVisitID", None), ("eventDate", None)],
    );
    let errors = composite.validate_row(&row);
    insta::assert_snapshot!(errors[0].note.as_str(), @"eventDate must be provided when siteID and siteVisitID is not provided");

    let mut computed = DefaultLookup::new(
        KeySource::computed("the visit", |row: &Row| {
            Some(format!("{}|{}", row.key("site")?, row.key("visit")?))
        }),
        "eventDate",
        defaults,
    )
    .with_messages(None, Some("no default for {key_value}"));
    let row = make_row(3, &[("site", Some("S2")), ("visit", Some("V1")), ("eventDate", None)]);
    let errors = computed.validate_row(&row);
    insta::assert_snapshot!(errors[0].note.as_str(), @"no default for S2|V1");
}

#[test]
fn malformed_custom_template_falls_back_to_default_wording() {
    let mut check = DefaultLookup::new(
        KeySource::Field("siteID".to_string()),
        "geodeticDatum",
        Arc::new(DefaultMap::new()),
    )
    .with_messages(Some("{unknown} is missing"), Some("unbalanced {key_value"));

    let errors = check.validate_row(&make_row(1, &[("siteID", None)]));
    insta::assert_snapshot!(errors[0].note.as_str(), @"geodeticDatum must be provided when siteID is not provided");
    let errors = check.validate_row(&make_row(2, &[("siteID", Some("S1"))]));
    insta::assert_snapshot!(errors[0].note.as_str(), @r#"geodeticDatum must be provided because no default exists for siteID "S1""#);
}

#[test]
fn row_constraint_evaluates_formula_with_side_inputs() {
    let mut check = RowConstraint::new("individualCount >= minimum or occurrenceStatus == 'absent'")
        .with_side_input("minimum", &json!(1));

    let row = Row::from_pairs(
        1,
        [("individualCount", Value::Integer(2)), ("occurrenceStatus", Value::from("present"))],
    );
    assert!(check.validate_row(&row).is_empty());

    let row = Row::from_pairs(
        2,
        [("individualCount", Value::Integer(0)), ("occurrenceStatus", Value::from("present"))],
    );
    let errors = check.validate_row(&row);
    assert_eq!(errors[0].kind, ErrorKind::RowConstraint);
    insta::assert_snapshot!(errors[0].note.as_str(), @r#"the row constraint "individualCount >= minimum or occurrenceStatus == 'absent'" is not satisfied"#);
}

#[test]
fn row_constraint_reports_configuration_problems_per_row() {
    let mut invalid = RowConstraint::new("a ==");
    for number in 1..=2 {
        let errors = invalid.validate_row(&make_row(number, &[("a", Some("x"))]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Check);
        assert_eq!(errors[0].row_number, Some(number));
    }

    let mut colliding = RowConstraint::new("a == 'x'").with_side_input("a", &json!("x"));
    let errors = colliding.validate_row(&make_row(1, &[("a", Some("x"))]));
    assert_eq!(errors[0].kind, ErrorKind::Check);
    insta::assert_snapshot!(errors[0].note.as_str(), @r#"side input "a" collides with a field of the same name"#);
}

#[test]
fn sites_geometry_needs_point_or_footprint_with_datum() {
    let mut check = SitesGeometry::new(GeometryFields::default());
    let row = make_row(
        1,
        &[
            ("decimalLatitude", Some("-35")),
            ("decimalLongitude", Some("149")),
            ("geodeticDatum", Some("WGS84")),
        ],
    );
    assert!(check.validate_row(&row).is_empty());
    let row = make_row(
        2,
        &[("footprintWKT", Some("POINT (149 -35)")), ("geodeticDatum", Some("WGS84"))],
    );
    assert!(check.validate_row(&row).is_empty());

    let no_datum = make_row(3, &[("footprintWKT", Some("POINT (149 -35)"))]);
    insta::assert_snapshot!(check.validate_row(&no_datum)[0].note.as_str(), @"geodeticDatum must be provided when decimalLatitude and decimalLongitude or footprintWKT are provided");

    let half_point = make_row(4, &[("decimalLatitude", Some("-35"))]);
    insta::assert_snapshot!(check.validate_row(&half_point)[0].note.as_str(), @"decimalLatitude and decimalLongitude must be provided together");

    let nothing = make_row(5, &[("siteID", Some("S1"))]);
    insta::assert_snapshot!(check.validate_row(&nothing)[0].note.as_str(), @"either decimalLatitude, decimalLongitude and geodeticDatum, or footprintWKT and geodeticDatum must be provided");
}

#[test]
fn sites_geometry_exempts_sites_with_occurrence_geometry() {
    let mut check =
        SitesGeometry::new(GeometryFields::default()).with_occurrence_sites(make_set(&["S1"]));
    assert!(check.validate_row(&make_row(1, &[("siteID", Some("S1"))])).is_empty());
    assert_eq!(check.validate_row(&make_row(2, &[("siteID", Some("S2"))])).len(), 1);
}

#[test]
fn sites_geometry_names_renamed_columns() {
    let fields = GeometryFields {
        latitude: "lat".to_string(),
        longitude: "lon".to_string(),
        datum: "datum".to_string(),
        footprint: "shape".to_string(),
        site_id: "site".to_string(),
    };
    let mut check = SitesGeometry::new(fields);
    let no_datum = make_row(1, &[("lat", Some("-35")), ("lon", Some("149"))]);
    insta::assert_snapshot!(check.validate_row(&no_datum)[0].note.as_str(), @"datum must be provided when lat and lon or shape are provided");

    let half_point = make_row(2, &[("lon", Some("149"))]);
    insta::assert_snapshot!(check.validate_row(&half_point)[0].note.as_str(), @"lat and lon must be provided together");
}

#[test]
fn unique_together_points_at_first_row() {
    let mut check = UniqueTogether::new(["siteID", "siteVisitID"]);
    let first = make_row(1, &[("siteID", Some("S1")), ("siteVisitID", Some("V1"))]);
    let other = make_row(2, &[("siteID", Some("S1")), ("siteVisitID", Some("V2"))]);
    let repeat = make_row(3, &[("siteID", Some("S1")), ("siteVisitID", Some("V1"))]);

    assert!(check.validate_row(&first).is_empty());
    assert!(check.validate_row(&other).is_empty());
    let errors = check.validate_row(&repeat);
    assert_eq!(errors[0].kind, ErrorKind::RowConstraint);
    assert_eq!(errors[0].row_number, Some(3));
    insta::assert_snapshot!(errors[0].note.as_str(), @r#"the fields siteID, siteVisitID with values "S1", "V1" have already been used in the row at position 1"#);
}

#[test]
fn unique_together_null_handling_and_custom_message() {
    let rows = [
        make_row(1, &[("a", Some("x")), ("b", None)]),
        make_row(2, &[("a", Some("x")), ("b", None)]),
    ];

    let mut skip = UniqueTogether::new(["a", "b"]);
    assert!(rows.iter().all(|row| skip.validate_row(row).is_empty()));

    let mut include = UniqueTogether::new(["a", "b"])
        .with_null_handling(NullHandling::Include)
        .with_message("duplicate of row {first_seen_row_number} at row {row_number}: {values}");
    assert!(include.validate_row(&rows[0]).is_empty());
    let errors = include.validate_row(&rows[1]);
    insta::assert_snapshot!(errors[0].note.as_str(), @r#"duplicate of row 1 at row 2: "x", null"#);
}

#[test]
fn chronological_order_compares_adjacent_pairs() {
    let mut check = ChronologicalOrder::new(["eventDateStart", "eventDateEnd"]);
    let ordered = make_row(1, &[("eventDateStart", Some("2021-04-01")), ("eventDateEnd", Some("2021-05-01"))]);
    assert!(check.validate_row(&ordered).is_empty());

    let reversed = make_row(2, &[("eventDateStart", Some("2021-05-01")), ("eventDateEnd", Some("2021-04-01"))]);
    let errors = check.validate_row(&reversed);
    assert_eq!(errors.len(), 1);
    insta::assert_snapshot!(errors[0].note.as_str(), @"eventDateStart (2021-05-01) must not be later than eventDateEnd (2021-04-01)");

    let mixed = make_row(3, &[("eventDateStart", Some("2021")), ("eventDateEnd", Some("2021-01-15"))]);
    assert!(check.validate_row(&mixed).is_empty());

    let partial = make_row(4, &[("eventDateStart", Some("2022")), ("eventDateEnd", None)]);
    assert!(check.validate_row(&partial).is_empty());
}

#[test]
fn chronological_order_with_one_field_is_a_check_error() {
    let mut check = ChronologicalOrder::new(["eventDate"]);
    let errors = check.validate_row(&make_row(1, &[("eventDate", Some("2021"))]));
    assert_eq!(errors[0].kind, ErrorKind::Check);
    insta::assert_snapshot!(errors[0].note.as_str(), @"chronological order requires at least two fields");
}

#[test]
fn site_identifier_match_accepts_visits_without_identifier() {
    let sites: SiteIdentifierMap = BTreeMap::from([("V1".to_string(), None)]);
    let mut check = SiteIdentifierMatch::new("siteVisitID", "site visit data", Arc::new(sites));

    let known = make_row(1, &[("siteVisitID", Some("V1")), ("siteID", Some("S1"))]);
    assert!(check.validate_row(&known).is_empty());

    let unknown = make_row(2, &[("siteVisitID", Some("V2"))]);
    let errors = check.validate_row(&unknown);
    assert_eq!(errors[0].kind, ErrorKind::Constraint);
    assert_eq!(errors[0].field_name.as_deref(), Some("siteVisitID"));
    insta::assert_snapshot!(errors[0].note.as_str(), @"siteVisitID must match a siteVisitID in the site visit data template");
}

#[test]
fn site_identifier_match_reports_mismatched_fields() {
    let sites: SiteIdentifierMap = BTreeMap::from([
        (
            "V1".to_string(),
            Some(SiteIdentifier::Local {
                id: "S1".to_string(),
                source: "ORG".to_string(),
            }),
        ),
        (
            "V2".to_string(),
            Some(SiteIdentifier::External {
                iri: "https://example.org/site/1".to_string(),
            }),
        ),
    ]);
    let mut check = SiteIdentifierMatch::new("siteVisitID", "site visit data", Arc::new(sites))
        .with_fields(SiteIdentifierFields::default());

    let matching = make_row(
        1,
        &[("siteVisitID", Some("V1")), ("siteID", Some("S1")), ("siteIDSource", Some("ORG"))],
    );
    assert!(check.validate_row(&matching).is_empty());

    let wrong_source = make_row(
        2,
        &[("siteVisitID", Some("V1")), ("siteID", Some("S1")), ("siteIDSource", Some("OTHER"))],
    );
    let errors = check.validate_row(&wrong_source);
    assert_eq!(errors[0].kind, ErrorKind::RowConstraint);
    insta::assert_snapshot!(errors[0].note.as_str(), @r#"the site identifier does not match the site recorded for siteVisitID "V1" in the site visit data template (mismatched: siteIDSource)"#);

    let external = make_row(
        3,
        &[("siteVisitID", Some("V2")), ("existingBDRSiteIRI", Some("https://example.org/site/1"))],
    );
    assert!(check.validate_row(&external).is_empty());
}

#[test]
fn set_membership_checks_values_and_list_items() {
    let mut check = SetMembership::new("surveyID", "survey metadata", make_set(&["SV1", "SV2"]));
    assert!(check.validate_row(&make_row(1, &[("surveyID", Some("SV1"))])).is_empty());
    assert!(check.validate_row(&make_row(2, &[("surveyID", None)])).is_empty());

    let errors = check.validate_row(&make_row(3, &[("surveyID", Some("SV3"))]));
    assert_eq!(errors[0].kind, ErrorKind::Constraint);
    assert_eq!(errors[0].cell.as_deref(), Some("SV3"));
    insta::assert_snapshot!(errors[0].note.as_str(), @"surveyID must match a surveyID in the survey metadata template");

    let mut related = SetMembership::new("relatedSiteID", "site data", make_set(&["S1"]))
        .with_source_field("siteID")
        .only_when(Gate::new("relationshipToRelatedSite", ["partOf"]));
    let ungated = make_row(
        1,
        &[("relatedSiteID", Some("S9")), ("relationshipToRelatedSite", Some("sameAs"))],
    );
    assert!(related.validate_row(&ungated).is_empty());
    let gated = make_row(
        2,
        &[("relatedSiteID", Some("S9")), ("relationshipToRelatedSite", Some("partOf"))],
    );
    insta::assert_snapshot!(related.validate_row(&gated)[0].note.as_str(), @"relatedSiteID must match a siteID in the site data template");

    let list = Row::from_pairs(3, [("surveyID", Value::List(vec!["SV1".to_string(), "SV9".to_string()]))]);
    assert_eq!(check.validate_row(&list).len(), 1);
}

#[test]
fn identifier_presence_requires_exactly_one_scheme() {
    let mut check = IdentifierPresence::new(SiteIdentifierFields::default());
    let local = make_row(1, &[("siteID", Some("S1")), ("siteIDSource", Some("ORG"))]);
    let external = make_row(2, &[("existingBDRSiteIRI", Some("https://example.org/site/1"))]);
    assert!(check.validate_row(&local).is_empty());
    assert!(check.validate_row(&external).is_empty());

    let both = make_row(
        3,
        &[("siteID", Some("S1")), ("siteIDSource", Some("ORG")), ("existingBDRSiteIRI", Some("x"))],
    );
    insta::assert_snapshot!(check.validate_row(&both)[0].note.as_str(), @"only one of siteID and siteIDSource, or existingBDRSiteIRI may be provided");

    let partial = make_row(4, &[("siteID", Some("S1"))]);
    insta::assert_snapshot!(check.validate_row(&partial)[0].note.as_str(), @"either siteID and siteIDSource, or existingBDRSiteIRI must be provided");

    let mut gated = IdentifierPresence::new(SiteIdentifierFields::default()).only_when_present("siteVisitID");
    assert!(gated.validate_row(&make_row(5, &[("siteVisitID", None)])).is_empty());
    assert_eq!(gated.validate_row(&make_row(6, &[("siteVisitID", Some("V1"))])).len(), 1);
}

#[test]
fn identifier_presence_names_renamed_columns() {
    let fields = SiteIdentifierFields {
        site_id: "localSite".to_string(),
        site_id_source: "localSiteOrg".to_string(),
        existing_site_iri: "siteIRI".to_string(),
    };
    let mut check = IdentifierPresence::new(fields);
    let partial = make_row(1, &[("localSiteOrg", Some("ORG"))]);
    insta::assert_snapshot!(check.validate_row(&partial)[0].note.as_str(), @"either localSite and localSiteOrg, or siteIRI must be provided");
}

#[test]
fn checks_declare_the_kinds_they_emit() {
    let checks: Vec<Box<dyn Check>> = vec![
        Box::new(Tabular::new()),
        Box::new(NotEmpty::new()),
        Box::new(Required::new(["a"])),
        Box::new(ChronologicalOrder::new(["a", "b"])),
    ];
    let kinds: Vec<&[ErrorKind]> = checks.iter().map(|check| check.error_kinds()).collect();
    assert_eq!(kinds[0], &[ErrorKind::Source]);
    assert_eq!(kinds[1], &[ErrorKind::TableDimensions]);
    assert_eq!(kinds[2], &[ErrorKind::RowConstraint, ErrorKind::Check]);
    assert!(kinds[3].contains(&ErrorKind::RowConstraint));
}
