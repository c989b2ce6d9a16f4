//! Ordered statement indexes
//!
//! Each index is a `BTreeMap` keyed by the statement's nodes permuted into
//! one field order. Triple orders put the graph last, so statements without
//! a graph sort first within each (s, p, o) group; graph-first orders put it
//! in front so a bound graph narrows the scan.

use super::flags::ModelFlags;
use crate::error::TrellisError;
use crate::node::Node;
use crate::statement::{Field, Statement};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

/// A statement's nodes in some index order; `None` only for an absent graph
pub(crate) type Key = [Option<Node>; 4];

/// Field order of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexOrder {
    Spo,
    Sop,
    Ops,
    Osp,
    Pso,
    Pos,
    Gspo,
    Gsop,
    Gops,
    Gosp,
    Gpso,
    Gpos,
}

use Field::{Graph as G, Object as O, Predicate as P, Subject as S};

impl IndexOrder {
    /// The six graph-last orders, in flag order
    pub const TRIPLE_ORDERS: [IndexOrder; 6] = [
        IndexOrder::Spo,
        IndexOrder::Sop,
        IndexOrder::Ops,
        IndexOrder::Osp,
        IndexOrder::Pso,
        IndexOrder::Pos,
    ];

    /// Get all index orders
    pub fn all() -> &'static [IndexOrder] {
        &[
            IndexOrder::Spo,
            IndexOrder::Sop,
            IndexOrder::Ops,
            IndexOrder::Osp,
            IndexOrder::Pso,
            IndexOrder::Pos,
            IndexOrder::Gspo,
            IndexOrder::Gsop,
            IndexOrder::Gops,
            IndexOrder::Gosp,
            IndexOrder::Gpso,
            IndexOrder::Gpos,
        ]
    }

    /// Statement fields in key order
    pub fn fields(&self) -> [Field; 4] {
        match self {
            IndexOrder::Spo => [S, P, O, G],
            IndexOrder::Sop => [S, O, P, G],
            IndexOrder::Ops => [O, P, S, G],
            IndexOrder::Osp => [O, S, P, G],
            IndexOrder::Pso => [P, S, O, G],
            IndexOrder::Pos => [P, O, S, G],
            IndexOrder::Gspo => [G, S, P, O],
            IndexOrder::Gsop => [G, S, O, P],
            IndexOrder::Gops => [G, O, P, S],
            IndexOrder::Gosp => [G, O, S, P],
            IndexOrder::Gpso => [G, P, S, O],
            IndexOrder::Gpos => [G, P, O, S],
        }
    }

    /// The graph-first variant of this order
    pub fn graph_first(&self) -> IndexOrder {
        match self {
            IndexOrder::Spo | IndexOrder::Gspo => IndexOrder::Gspo,
            IndexOrder::Sop | IndexOrder::Gsop => IndexOrder::Gsop,
            IndexOrder::Ops | IndexOrder::Gops => IndexOrder::Gops,
            IndexOrder::Osp | IndexOrder::Gosp => IndexOrder::Gosp,
            IndexOrder::Pso | IndexOrder::Gpso => IndexOrder::Gpso,
            IndexOrder::Pos | IndexOrder::Gpos => IndexOrder::Gpos,
        }
    }

    /// The model flag that enables this order's triple variant
    pub fn flag(&self) -> ModelFlags {
        match self {
            IndexOrder::Spo | IndexOrder::Gspo => ModelFlags::INDEX_SPO,
            IndexOrder::Sop | IndexOrder::Gsop => ModelFlags::INDEX_SOP,
            IndexOrder::Ops | IndexOrder::Gops => ModelFlags::INDEX_OPS,
            IndexOrder::Osp | IndexOrder::Gosp => ModelFlags::INDEX_OSP,
            IndexOrder::Pso | IndexOrder::Gpso => ModelFlags::INDEX_PSO,
            IndexOrder::Pos | IndexOrder::Gpos => ModelFlags::INDEX_POS,
        }
    }

    pub fn is_graph_first(&self) -> bool {
        self.fields()[0] == Field::Graph
    }

    /// Get the short name of this index
    pub fn name(&self) -> &'static str {
        match self {
            IndexOrder::Spo => "spo",
            IndexOrder::Sop => "sop",
            IndexOrder::Ops => "ops",
            IndexOrder::Osp => "osp",
            IndexOrder::Pso => "pso",
            IndexOrder::Pos => "pos",
            IndexOrder::Gspo => "gspo",
            IndexOrder::Gsop => "gsop",
            IndexOrder::Gops => "gops",
            IndexOrder::Gosp => "gosp",
            IndexOrder::Gpso => "gpso",
            IndexOrder::Gpos => "gpos",
        }
    }

    /// Number of leading key fields fixed by a pattern
    pub(crate) fn prefix_len(&self, pattern: &Pattern) -> usize {
        self.fields()
            .iter()
            .take_while(|field| pattern.get(**field).is_some())
            .count()
    }

    pub(crate) fn key(&self, statement: &Statement) -> Key {
        self.fields().map(|field| statement.node(field).cloned())
    }
}

impl std::fmt::Display for IndexOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for IndexOrder {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        IndexOrder::all()
            .iter()
            .find(|order| order.name() == lower)
            .copied()
            .ok_or_else(|| TrellisError::bad_arg(format!("unknown index order '{}'", s)))
    }
}

/// Fields fixed by a query, in statement field order; `None` is a wildcard
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Pattern([Option<Node>; 4]);

impl Pattern {
    pub fn new(
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> Self {
        Pattern([subject, predicate, object, graph].map(|node| node.cloned()))
    }

    pub fn get(&self, field: Field) -> Option<&Node> {
        self.0[field.index()].as_ref()
    }

    pub fn matches(&self, statement: &Statement) -> bool {
        statement.matches(
            self.get(Field::Subject),
            self.get(Field::Predicate),
            self.get(Field::Object),
            self.get(Field::Graph),
        )
    }
}

/// One ordered view of a model's statements
#[derive(Debug)]
pub(crate) struct Index {
    order: IndexOrder,
    entries: BTreeMap<Key, Arc<Statement>>,
}

impl Index {
    pub fn new(order: IndexOrder) -> Self {
        Self {
            order,
            entries: BTreeMap::new(),
        }
    }

    pub fn order(&self) -> IndexOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &Key) -> Option<&Arc<Statement>> {
        self.entries.get(key)
    }

    pub fn contains(&self, statement: &Statement) -> bool {
        self.entries.contains_key(&self.order.key(statement))
    }

    pub fn insert(&mut self, statement: Arc<Statement>) {
        self.entries.insert(self.order.key(&statement), statement);
    }

    pub fn remove(&mut self, statement: &Statement) -> Option<Arc<Statement>> {
        self.entries.remove(&self.order.key(statement))
    }

    /// Key of the first entry at or after the start of the pattern's prefix
    pub fn seek(&self, pattern: &Pattern, prefix_len: usize) -> Option<Key> {
        let mut lower: Key = Default::default();
        for (slot, field) in lower.iter_mut().zip(self.order.fields()).take(prefix_len) {
            *slot = pattern.get(field).cloned();
        }
        self.scan(pattern, prefix_len, Bound::Included(&lower))
    }

    /// Key of the first matching entry strictly after `key`
    pub fn successor(&self, key: &Key, pattern: &Pattern, prefix_len: usize) -> Option<Key> {
        self.scan(pattern, prefix_len, Bound::Excluded(key))
    }

    fn scan(&self, pattern: &Pattern, prefix_len: usize, from: Bound<&Key>) -> Option<Key> {
        let fields = self.order.fields();
        self.entries
            .range::<Key, _>((from, Bound::Unbounded))
            .take_while(|(key, _)| {
                fields[..prefix_len]
                    .iter()
                    .zip(key.iter())
                    .all(|(field, node)| node.as_ref() == pattern.get(*field))
            })
            .find(|(_, statement)| pattern.matches(statement))
            .map(|(key, _)| key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Node {
        Node::uri(&format!("http://example.org/{}", s)).unwrap()
    }

    fn st(s: &str, p: &str, o: &str, g: Option<&str>) -> Arc<Statement> {
        Arc::new(Statement::new(uri(s), uri(p), uri(o), g.map(uri)).unwrap())
    }

    #[test]
    fn test_order_names_roundtrip() {
        for order in IndexOrder::all() {
            assert_eq!(order.name().parse::<IndexOrder>().unwrap(), *order);
        }
        assert_eq!("POS".parse::<IndexOrder>().unwrap(), IndexOrder::Pos);
        assert!("spx".parse::<IndexOrder>().is_err());
    }

    #[test]
    fn test_fields_are_permutations() {
        for order in IndexOrder::all() {
            let mut fields = order.fields().to_vec();
            fields.sort();
            assert_eq!(fields, Field::ALL.to_vec(), "{}", order);
            assert_eq!(order.is_graph_first(), order.graph_first() == *order);
        }
    }

    #[test]
    fn test_key_permutes_fields() {
        let statement = st("s", "p", "o", Some("g"));
        let key = IndexOrder::Gpos.key(&statement);
        assert_eq!(key, [Some(uri("g")), Some(uri("p")), Some(uri("o")), Some(uri("s"))]);

        let triple = st("s", "p", "o", None);
        assert_eq!(IndexOrder::Spo.key(&triple)[3], None);
    }

    #[test]
    fn test_prefix_len() {
        let p = uri("p");
        let o = uri("o");
        let pattern = Pattern::new(None, Some(&p), Some(&o), None);
        assert_eq!(IndexOrder::Spo.prefix_len(&pattern), 0);
        assert_eq!(IndexOrder::Pos.prefix_len(&pattern), 2);
        assert_eq!(IndexOrder::Pso.prefix_len(&pattern), 1);
        assert_eq!(IndexOrder::Gpos.prefix_len(&pattern), 0);
    }

    #[test]
    fn test_seek_and_successor_stay_within_prefix() {
        let mut index = Index::new(IndexOrder::Pos);
        index.insert(st("a", "p", "x", None));
        index.insert(st("b", "p", "x", None));
        index.insert(st("c", "p", "y", None));
        index.insert(st("d", "q", "x", None));

        let p = uri("p");
        let x = uri("x");
        let pattern = Pattern::new(None, Some(&p), Some(&x), None);
        let len = IndexOrder::Pos.prefix_len(&pattern);

        let first = index.seek(&pattern, len).unwrap();
        assert_eq!(first[2], Some(uri("a")));
        let second = index.successor(&first, &pattern, len).unwrap();
        assert_eq!(second[2], Some(uri("b")));
        assert!(index.successor(&second, &pattern, len).is_none());
    }

    #[test]
    fn test_scan_filters_fields_outside_prefix() {
        let mut index = Index::new(IndexOrder::Spo);
        index.insert(st("a", "p", "x", None));
        index.insert(st("b", "p", "y", None));
        index.insert(st("c", "q", "y", None));

        let y = uri("y");
        let pattern = Pattern::new(None, None, Some(&y), None);
        let first = index.seek(&pattern, 0).unwrap();
        assert_eq!(first[0], Some(uri("b")));
        let next = index.successor(&first, &pattern, 0).unwrap();
        assert_eq!(next[0], Some(uri("c")));
    }

    #[test]
    fn test_insert_remove() {
        let mut index = Index::new(IndexOrder::Ops);
        let statement = st("s", "p", "o", Some("g"));
        index.insert(statement.clone());
        assert!(index.contains(&statement));
        assert_eq!(index.len(), 1);
        assert!(index.remove(&statement).is_some());
        assert_eq!(index.len(), 0);
    }
}
