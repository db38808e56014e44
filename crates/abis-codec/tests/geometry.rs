use abis_codec::geometry::canonicalize;
use abis_codec::{Codec, WktCodec};
use abis_model::{Field, Value};

fn decode_wkt(codec: &WktCodec, raw: &str) -> String {
    match codec.decode_str(raw).expect("valid wkt") {
        Value::Geometry(geometry) => geometry.as_wkt().to_string(),
        other => panic!("expected geometry, got {other:?}"),
    }
}

#[test]
fn rounds_coordinates_to_default_precision() {
    let codec = WktCodec::default();
    assert_eq!(
        decode_wkt(&codec, "POINT (147.1234567891   -42.5)"),
        "POINT (147.12345679 -42.5)"
    );
}

#[test]
fn normalizes_layout() {
    let codec = WktCodec::default();
    assert_eq!(
        decode_wkt(&codec, "POLYGON((0 0,1 0 ,1 1,  0 0))"),
        "POLYGON ((0 0, 1 0, 1 1, 0 0))"
    );
}

#[test]
fn field_precision_overrides_default() {
    let field = Field::new("footprintWKT", "wkt").with_precision(2);
    let codec = WktCodec::from_field(&field).expect("codec");
    assert_eq!(
        decode_wkt(&codec, "LINESTRING (1.005 2.999, -0.001 3)"),
        "LINESTRING (1 3, 0 3)"
    );
}

#[test]
fn rejects_malformed_text() {
    let codec = WktCodec::default();
    assert!(codec.decode_str("POINT (1)").is_err());
    assert!(codec.decode_str("CIRCLE (1 2)").is_err());
    assert!(codec.decode(&Value::Number(1.0)).is_err());
    assert_eq!(codec.decode_str("  ").expect("blank"), Value::Null);
}

#[test]
fn encoding_is_stable_after_decode() {
    let codec = WktCodec::default();
    let decoded = codec.decode_str("POINT (151.2 -33.9)").expect("valid");
    let encoded = codec.encode(&decoded).expect("encode");
    assert_eq!(codec.decode_str(&encoded).expect("valid"), decoded);
    assert_eq!(canonicalize(&encoded, 8).expect("canonical"), encoded);
}

#[test]
fn writes_every_geometry_kind() {
    let canonical = |text: &str| canonicalize(text, 3).expect(text);

    insta::assert_snapshot!(canonical("point empty"), @"POINT EMPTY");
    insta::assert_snapshot!(canonical("multipoint (1 2, 3.00049 4)"), @"MULTIPOINT ((1 2), (3 4))");
    insta::assert_snapshot!(
        canonical("POLYGON ((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 2 2, 1 1))"),
        @"POLYGON ((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 2 2, 1 1))"
    );
    insta::assert_snapshot!(
        canonical("MULTIPOLYGON (((0 0,1 0,1 1,0 0)))"),
        @"MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))"
    );
    insta::assert_snapshot!(
        canonical("GEOMETRYCOLLECTION (POINT (1 2), LINESTRING (0 0, 1.2346 1))"),
        @"GEOMETRYCOLLECTION (POINT (1 2), LINESTRING (0 0, 1.235 1))"
    );
}

#[test]
fn keeps_extra_dimensions() {
    let canonical = |text: &str| canonicalize(text, 2).expect(text);

    insta::assert_snapshot!(canonical("POINT Z (1 2 3.456)"), @"POINT Z (1 2 3.46)");
    insta::assert_snapshot!(canonical("LINESTRING M (0 0 1, 1 1 2)"), @"LINESTRING M (0 0 1, 1 1 2)");
    insta::assert_snapshot!(canonical("POINT ZM (1 2 3 4)"), @"POINT ZM (1 2 3 4)");
}
