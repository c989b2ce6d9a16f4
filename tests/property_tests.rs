//! Property-based tests for trellis invariants.
//!
//! - Insertion is idempotent
//! - Node ordering is a total order
//! - Qualifying then expanding a URI is the identity
//! - `get` recovers whichever field was left out
//! - Canonical numeric and Base64 forms round-trip

mod common;

use proptest::prelude::*;
use std::cmp::Ordering;
use trellis::{Env, ModelFlags, Node, NodeType, Statement};

/// Local names usable in URIs and CURIEs
fn arb_local() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_map(|s| s)
}

fn arb_node() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-z]{0,4}".prop_map(|s| Node::string(&s)),
        ("[a-z]{0,4}", "[a-z]{2}")
            .prop_map(|(s, lang)| Node::plain_literal(&s, Some(&lang)).unwrap()),
        ("[a-z]{0,4}", arb_local()).prop_map(|(s, dt)| {
            Node::typed_literal(&s, Some(&common::uri(&dt))).unwrap()
        }),
        arb_local().prop_map(|s| common::uri(&s)),
        arb_local().prop_map(|s| Node::blank(&s).unwrap()),
    ]
}

fn arb_statement() -> impl Strategy<Value = Statement> {
    (
        arb_local(),
        arb_local(),
        arb_node(),
        proptest::option::of(arb_local()),
    )
        .prop_map(|(s, p, o, g)| {
            Statement::new(common::uri(&s), common::uri(&p), o, g.map(|g| common::uri(&g)))
                .unwrap()
        })
}

mod model_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn insert_is_idempotent(statements in proptest::collection::vec(arb_statement(), 1..20)) {
            let mut model = common::new_model(common::all_indexes());
            for st in &statements {
                model.insert(st).unwrap();
            }
            let size = model.size();
            for st in &statements {
                prop_assert!(!model.insert(st).unwrap());
            }
            prop_assert_eq!(model.size(), size);
        }

        #[test]
        fn every_index_sees_every_statement(statements in proptest::collection::vec(arb_statement(), 1..20)) {
            let mut model = common::new_model(common::all_indexes());
            for st in &statements {
                model.insert(st).unwrap();
            }
            for st in &statements {
                let graph = st.graph();
                prop_assert!(model.ask(Some(st.subject()), None, None, graph));
                prop_assert!(model.ask(None, Some(st.predicate()), None, graph));
                prop_assert!(model.ask(None, None, Some(st.object()), graph));
                let found = model
                    .find(Some(st.subject()), Some(st.predicate()), Some(st.object()), graph)
                    .unwrap();
                prop_assert!(!found.is_end());
            }
        }

        #[test]
        fn get_recovers_missing_field(st in arb_statement()) {
            let mut model = common::new_model(ModelFlags::INDEX_SPO | ModelFlags::INDEX_GRAPHS);
            model.insert(&st).unwrap();
            let (s, p, o, g) = (st.subject(), st.predicate(), st.object(), st.graph());

            let got_s = model.get(None, Some(p), Some(o), g).unwrap();
            prop_assert_eq!(got_s.as_ref(), Some(s));
            let got_p = model.get(Some(s), None, Some(o), g).unwrap();
            prop_assert_eq!(got_p.as_ref(), Some(p));
            let got_o = model.get(Some(s), Some(p), None, g).unwrap();
            prop_assert_eq!(got_o.as_ref(), Some(o));
            let got_g = model.get(Some(s), Some(p), Some(o), None).unwrap();
            prop_assert_eq!(got_g.as_ref(), g);
        }

        #[test]
        fn erase_all_empties_model(statements in proptest::collection::vec(arb_statement(), 0..20)) {
            let mut model = common::new_model(common::all_indexes());
            for st in &statements {
                model.insert(st).unwrap();
            }
            let mut iter = model.begin();
            while !iter.is_end() {
                iter = model.erase(iter).unwrap();
            }
            prop_assert!(model.is_empty());
        }
    }
}

mod node_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn ordering_is_transitive(a in arb_node(), b in arb_node(), c in arb_node()) {
            if a <= b && b <= c {
                prop_assert!(a <= c);
            }
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
            prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
        }

        #[test]
        fn qualify_then_expand_is_identity(local in arb_local()) {
            let mut env = Env::new(None);
            env.set_prefix_from_strings("eg", common::NS).unwrap();
            let full = common::uri(&local);

            let curie = env.qualify(&full).unwrap();
            prop_assert_eq!(curie.node_type(), NodeType::Curie);
            prop_assert_eq!(env.expand(&curie), Some(full));
        }

        #[test]
        fn decimal_reads_back_close(value in -1.0e6f64..1.0e6f64) {
            let node = Node::decimal(value, 0, 8, None).unwrap();
            prop_assert!(node.as_str().contains('.'));
            let back = node.as_double().unwrap();
            prop_assert!((back - value).abs() <= 0.5e-8 + value.abs() * 1e-15);
        }

        #[test]
        fn double_reads_back_exactly(value in proptest::num::f64::NORMAL) {
            let node = Node::double(value);
            prop_assert_eq!(node.as_double(), Some(value));
        }

        #[test]
        fn blob_round_trips(bytes in proptest::collection::vec(any::<u8>(), 1..300), wrap in any::<bool>()) {
            let node = Node::blob(&bytes, wrap, None).unwrap();
            prop_assert_eq!(node.blob_bytes().unwrap(), bytes);
        }
    }
}
