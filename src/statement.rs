//! Statements (quads) and their provenance cursors

use crate::error::{TrellisError, TrellisResult};
use crate::node::{Node, NodeType};
use serde::{Deserialize, Serialize};

/// Index of a node within a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Field {
    Subject = 0,
    Predicate = 1,
    Object = 2,
    Graph = 3,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Subject, Field::Predicate, Field::Object, Field::Graph];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Document position a statement was read from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    /// Document name, usually a file URI
    pub name: Node,
    /// 1-based line
    pub line: u32,
    /// 0-based column
    pub col: u32,
}

impl Cursor {
    pub fn new(name: Node, line: u32, col: u32) -> Self {
        Self { name, line, col }
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.name.as_str(), self.line, self.col)
    }
}

/// A triple with an optional graph, plus optional provenance.
///
/// Equality ignores the cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StatementRepr", into = "StatementRepr")]
pub struct Statement {
    subject: Node,
    predicate: Node,
    object: Node,
    graph: Option<Node>,
    cursor: Option<Cursor>,
}

impl Statement {
    /// Create a statement.
    ///
    /// Fails if the subject is a literal or the predicate is a literal or a
    /// blank node.
    pub fn new(
        subject: Node,
        predicate: Node,
        object: Node,
        graph: Option<Node>,
    ) -> TrellisResult<Self> {
        if subject.node_type() == NodeType::Literal {
            return Err(TrellisError::bad_arg(format!(
                "literal subject {}",
                subject
            )));
        }
        if matches!(predicate.node_type(), NodeType::Literal | NodeType::Blank) {
            return Err(TrellisError::bad_arg(format!(
                "predicate {} is not a URI",
                predicate
            )));
        }
        if matches!(&graph, Some(g) if g.node_type() == NodeType::Literal) {
            return Err(TrellisError::bad_arg("literal graph"));
        }
        Ok(Self {
            subject,
            predicate,
            object,
            graph,
            cursor: None,
        })
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub(crate) fn without_cursor(mut self) -> Self {
        self.cursor = None;
        self
    }

    /// Node in the given position (`None` only for an absent graph)
    pub fn node(&self, field: Field) -> Option<&Node> {
        match field {
            Field::Subject => Some(&self.subject),
            Field::Predicate => Some(&self.predicate),
            Field::Object => Some(&self.object),
            Field::Graph => self.graph.as_ref(),
        }
    }

    pub(crate) fn map_nodes(
        &self,
        mut f: impl FnMut(&Node) -> TrellisResult<Node>,
    ) -> TrellisResult<Self> {
        let mut mapped = Self::new(
            f(self.subject())?,
            f(self.predicate())?,
            f(self.object())?,
            self.graph().map(&mut f).transpose()?,
        )?;
        mapped.cursor = self.cursor.clone();
        Ok(mapped)
    }

    pub fn subject(&self) -> &Node {
        &self.subject
    }

    pub fn predicate(&self) -> &Node {
        &self.predicate
    }

    pub fn object(&self) -> &Node {
        &self.object
    }

    pub fn graph(&self) -> Option<&Node> {
        self.graph.as_ref()
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// True if every given field equals this statement's node there.
    ///
    /// `None` matches anything, including an absent graph.
    pub fn matches(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> bool {
        let pattern = [subject, predicate, object, graph];
        Field::ALL
            .iter()
            .zip(pattern)
            .all(|(&field, want)| want.is_none() || self.node(field) == want)
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.predicate == other.predicate
            && self.object == other.object
            && self.graph == other.graph
    }
}

impl Eq for Statement {}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject(), self.predicate(), self.object())?;
        if let Some(graph) = self.graph() {
            write!(f, " {}", graph)?;
        }
        f.write_str(" .")
    }
}

/// Serialized form of a statement
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatementRepr {
    subject: Node,
    predicate: Node,
    object: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    graph: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<Cursor>,
}

impl From<Statement> for StatementRepr {
    fn from(st: Statement) -> Self {
        StatementRepr {
            subject: st.subject,
            predicate: st.predicate,
            object: st.object,
            graph: st.graph,
            cursor: st.cursor,
        }
    }
}

impl TryFrom<StatementRepr> for Statement {
    type Error = TrellisError;

    fn try_from(repr: StatementRepr) -> Result<Self, Self::Error> {
        let st = Statement::new(repr.subject, repr.predicate, repr.object, repr.graph)?;
        Ok(match repr.cursor {
            Some(cursor) => st.with_cursor(cursor),
            None => st,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Node {
        Node::uri(&format!("http://example.org/{}", s)).unwrap()
    }

    #[test]
    fn test_new_validates_positions() {
        let lit = Node::string("hello");
        let blank = Node::blank("b1").unwrap();

        assert!(Statement::new(lit.clone(), uri("p"), uri("o"), None).is_err());
        assert!(Statement::new(uri("s"), lit.clone(), uri("o"), None).is_err());
        assert!(Statement::new(uri("s"), blank.clone(), uri("o"), None).is_err());
        assert!(Statement::new(uri("s"), uri("p"), uri("o"), Some(lit.clone())).is_err());

        assert!(Statement::new(blank.clone(), uri("p"), lit, Some(blank)).is_ok());
        let var = Node::variable("p").unwrap();
        assert!(Statement::new(uri("s"), var, uri("o"), None).is_ok());
    }

    #[test]
    fn test_accessors() {
        let st = Statement::new(uri("s"), uri("p"), uri("o"), Some(uri("g"))).unwrap();
        assert_eq!(st.subject(), &uri("s"));
        assert_eq!(st.predicate(), &uri("p"));
        assert_eq!(st.object(), &uri("o"));
        assert_eq!(st.graph(), Some(&uri("g")));
        assert_eq!(st.node(Field::Object), Some(&uri("o")));
        assert!(st.cursor().is_none());
    }

    #[test]
    fn test_matches_with_wildcards() {
        let st = Statement::new(uri("s"), uri("p"), uri("o"), Some(uri("g"))).unwrap();
        assert!(st.matches(None, None, None, None));
        assert!(st.matches(Some(&uri("s")), None, Some(&uri("o")), None));
        assert!(st.matches(None, None, None, Some(&uri("g"))));
        assert!(!st.matches(Some(&uri("o")), None, None, None));
        assert!(!st.matches(None, None, None, Some(&uri("h"))));

        let triple = Statement::new(uri("s"), uri("p"), uri("o"), None).unwrap();
        assert!(!triple.matches(None, None, None, Some(&uri("g"))));
    }

    #[test]
    fn test_equality_ignores_cursor() {
        let st = Statement::new(uri("s"), uri("p"), uri("o"), None).unwrap();
        let located = st
            .clone()
            .with_cursor(Cursor::new(Node::uri("file:///doc.ttl").unwrap(), 3, 7));
        assert_eq!(st, located);
        assert_eq!(located.cursor().unwrap().to_string(), "file:///doc.ttl:3:7");

        let quad = Statement::new(uri("s"), uri("p"), uri("o"), Some(uri("g"))).unwrap();
        assert_ne!(st, quad);
    }

    #[test]
    fn test_display() {
        let st = Statement::new(uri("s"), uri("p"), Node::string("x"), None).unwrap();
        assert_eq!(
            st.to_string(),
            "<http://example.org/s> <http://example.org/p> \"x\" ."
        );
    }

    #[test]
    fn test_serde_roundtrip_keeps_cursor() {
        let st = Statement::new(uri("s"), uri("p"), Node::integer(3, None), Some(uri("g")))
            .unwrap()
            .with_cursor(Cursor::new(Node::uri("file:///a.nq").unwrap(), 1, 0));
        let json = serde_json::to_string(&st).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, st);
        assert_eq!(back.cursor(), st.cursor());
    }

    #[test]
    fn test_deserialize_rejects_literal_subject() {
        let json = r#"{
            "subject": {"type": "literal", "value": "x"},
            "predicate": {"type": "uri", "value": "http://example.org/p"},
            "object": {"type": "uri", "value": "http://example.org/o"}
        }"#;
        assert!(serde_json::from_str::<Statement>(json).is_err());
    }
}
