//! Canonical lexical forms, URI helpers and randomized blob data

use rand::{Rng, SeedableRng};
use trellis::node::{file_uri_parse, parse_double, BLOB_LINE_LEN};
use trellis::vocab::xsd;
use trellis::{Node, NodeFlags, Status};

#[test]
fn test_numeric_literals() {
    let cases = [
        (Node::double(12.34), "1.234E1", xsd::DOUBLE),
        (Node::float(234.5), "2.345E2", xsd::FLOAT),
        (Node::integer(-0, None), "0", xsd::INTEGER),
        (Node::boolean(false), "false", xsd::BOOLEAN),
        (Node::decimal(-16.00001, 0, 8, None).unwrap(), "-16.00001", xsd::DECIMAL),
        (Node::decimal(0.0000000001, 0, 8, None).unwrap(), "0.0", xsd::DECIMAL),
    ];
    for (node, lexical, datatype) in cases {
        assert_eq!(node.as_str(), lexical);
        assert_eq!(node.datatype().unwrap().as_str(), datatype);
        assert_eq!(node.flags(), NodeFlags::HAS_DATATYPE);
        assert!(node.language().is_none());
    }
}

#[test]
fn test_special_doubles() {
    assert_eq!(Node::double(f64::NAN).as_str(), "NaN");
    assert_eq!(Node::double(f64::INFINITY).as_str(), "INF");
    assert_eq!(Node::float(f32::NEG_INFINITY).as_str(), "-INF");
    assert!(Node::double(f64::NAN).as_double().unwrap().is_nan());
    assert!(Node::decimal(f64::INFINITY, 0, 8, None).is_err());
}

#[test]
fn test_parse_double_prefix() {
    assert_eq!(parse_double("  -1.5e3 tail"), (-1500.0, 8));
    assert_eq!(Node::string("12 monkeys").as_double(), None);
    assert_eq!(Node::string("x€").as_double(), None);
    assert_eq!(Node::string("naïve").as_double(), None);
}

#[test]
fn test_random_blobs_round_trip() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x7e11_15);
    for _ in 0..64 {
        let len = rng.gen_range(1..512);
        let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let wrapped = Node::blob(&bytes, true, None).unwrap();
        assert!(wrapped.as_str().lines().all(|l| l.len() <= BLOB_LINE_LEN));
        assert_eq!(wrapped.blob_bytes().unwrap(), bytes);

        let flat = Node::blob(&bytes, false, None).unwrap();
        assert!(!flat.as_str().contains('\n'));
        assert_eq!(flat.blob_bytes().unwrap(), bytes);
    }
}

#[test]
fn test_wrapped_blob_sets_newline_flag() {
    let node = Node::blob(&[7u8; 100], true, None).unwrap();
    assert!(node.flags().contains(NodeFlags::HAS_NEWLINE));
    assert!(node.flags().contains(NodeFlags::HAS_DATATYPE));
}

#[test]
fn test_file_uri_round_trips() {
    let cases = [
        ("C:/My 100%", None, "file:///C:/My%20100%25"),
        ("/foo/bar", Some("bhost"), "file://bhost/foo/bar"),
        ("a/relative <path>", None, "a/relative%20%3Cpath%3E"),
    ];
    for (path, host, expected) in cases {
        let node = Node::file_uri(path, host).unwrap();
        assert_eq!(node.as_str(), expected);
        let (back, back_host) = file_uri_parse(node.as_str()).unwrap();
        assert_eq!(back, path);
        assert_eq!(back_host.as_deref(), host);
    }
    assert!(file_uri_parse("http://example.org/x").is_none());
}

#[test]
fn test_relative_uri_with_non_ascii_paths() {
    let base = Node::uri("http://example.org/è/").unwrap();
    let rel = Node::relative_uri("http://example.org/é", &base, None).unwrap();
    assert_eq!(rel.as_str(), "../é");
    assert_eq!(rel.resolve(&base).unwrap().as_str(), "http://example.org/é");
}

#[test]
fn test_empty_uri_rejected() {
    assert_eq!(Node::uri("").unwrap_err().status(), Status::ErrBadArg);
    assert!(Node::file_uri("", Some("host")).is_err());
}

#[test]
fn test_status_messages() {
    assert_eq!(Status::describe(Status::ErrBadIter.code()), Status::ErrBadIter.message());
    assert_eq!(Status::describe(42), "Unknown error");
}
