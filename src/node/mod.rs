//! Node representation: literals, URIs, CURIEs, blank nodes and variables
//!
//! A [`Node`] is an immutable value behind an `Arc`, so cloning a node shares
//! its storage. Nodes that recur across many statements are additionally
//! interned by the [`World`](crate::World) so a model holds one allocation
//! per distinct node.

mod blob;
mod numeric;
mod uri;


use crate::error::{TrellisError, TrellisResult};
use crate::vocab::xsd;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use blob::LINE_LEN as BLOB_LINE_LEN;
pub use numeric::parse_double;
pub use uri::{file_uri_parse, is_absolute as is_absolute_uri, UriParts};

/// Node type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum NodeType {
    /// Literal value, possibly with a datatype or language
    Literal = 1,
    /// URI (absolute or relative)
    Uri = 2,
    /// CURIE (shortened URI)
    Curie = 3,
    /// Blank node
    Blank = 4,
    /// Variable node
    Variable = 5,
}

/// Content flags derived from a node's string at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeFlags(u32);

impl NodeFlags {
    /// Contains line breaks (`\n` or `\r`)
    pub const HAS_NEWLINE: NodeFlags = NodeFlags(1);
    /// Contains quotes (`"`)
    pub const HAS_QUOTE: NodeFlags = NodeFlags(1 << 1);
    /// Literal node has datatype
    pub const HAS_DATATYPE: NodeFlags = NodeFlags(1 << 2);
    /// Literal node has language
    pub const HAS_LANGUAGE: NodeFlags = NodeFlags(1 << 3);

    pub const fn empty() -> Self {
        NodeFlags(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Scan a string for the content flags
    pub fn scan(s: &str) -> Self {
        let mut flags = NodeFlags::empty();
        for b in s.bytes() {
            match b {
                b'\n' | b'\r' => flags = flags | NodeFlags::HAS_NEWLINE,
                b'"' => flags = flags | NodeFlags::HAS_QUOTE,
                _ => {}
            }
        }
        flags
    }
}

impl std::ops::BitOr for NodeFlags {
    type Output = NodeFlags;

    fn bitor(self, rhs: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | rhs.0)
    }
}

#[derive(Debug)]
struct NodeData {
    node_type: NodeType,
    string: Box<str>,
    datatype: Option<Node>,
    language: Option<Node>,
    flags: NodeFlags,
}

/// An immutable, shared RDF node
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr", into = "NodeRepr")]
pub struct Node(Arc<NodeData>);

impl Node {
    pub(crate) fn build(
        node_type: NodeType,
        string: impl Into<Box<str>>,
        datatype: Option<Node>,
        language: Option<Node>,
    ) -> Self {
        let string = string.into();
        let mut flags = NodeFlags::scan(&string);
        if datatype.is_some() {
            flags = flags | NodeFlags::HAS_DATATYPE;
        }
        if language.is_some() {
            flags = flags | NodeFlags::HAS_LANGUAGE;
        }
        Node(Arc::new(NodeData {
            node_type,
            string,
            datatype,
            language,
            flags,
        }))
    }

    /// Create a non-literal node of the given type
    pub fn simple(node_type: NodeType, s: &str) -> TrellisResult<Self> {
        match node_type {
            NodeType::Literal => Err(TrellisError::bad_arg(
                "literals must be created with a literal constructor",
            )),
            _ if s.is_empty() => Err(TrellisError::bad_arg(format!(
                "empty {:?} node",
                node_type
            ))),
            _ => Ok(Self::build(node_type, s, None, None)),
        }
    }

    /// Create a plain string literal
    pub fn string(s: &str) -> Self {
        Self::build(NodeType::Literal, s, None, None)
    }

    /// Create a string literal from at most `len` bytes of `s`
    ///
    /// The length is clamped to the string and shortened, if needed, so that
    /// it never splits a UTF-8 sequence.
    pub fn substring(s: &str, len: usize) -> Self {
        let mut end = len.min(s.len());
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        Self::string(&s[..end])
    }

    /// Create a literal with an optional datatype or language (never both)
    pub fn literal(s: &str, datatype: Option<&Node>, language: Option<&str>) -> TrellisResult<Self> {
        match (datatype, language) {
            (Some(_), Some(_)) => Err(TrellisError::bad_arg(
                "literal cannot have both a datatype and a language",
            )),
            (Some(datatype), None) => Self::typed_literal(s, Some(datatype)),
            (None, language) => Self::plain_literal(s, language),
        }
    }

    /// Create a literal with an optional language tag
    pub fn plain_literal(s: &str, language: Option<&str>) -> TrellisResult<Self> {
        match language {
            None => Ok(Self::string(s)),
            Some("") => Err(TrellisError::bad_arg("empty language tag")),
            Some(lang) => Ok(Self::build(
                NodeType::Literal,
                s,
                None,
                Some(Self::string(lang)),
            )),
        }
    }

    /// Create a literal with an optional datatype
    ///
    /// Fails if the datatype is itself a literal or a blank node.
    pub fn typed_literal(s: &str, datatype: Option<&Node>) -> TrellisResult<Self> {
        match datatype {
            None => Ok(Self::string(s)),
            Some(dt) if matches!(dt.node_type(), NodeType::Uri | NodeType::Curie) => Ok(
                Self::build(NodeType::Literal, s, Some(dt.clone()), None),
            ),
            Some(dt) => Err(TrellisError::bad_arg(format!(
                "datatype must be a URI or CURIE, not {:?}",
                dt.node_type()
            ))),
        }
    }

    fn typed_with_default(lexical: String, datatype: Option<&Node>, default: &str) -> Self {
        let datatype = datatype
            .cloned()
            .unwrap_or_else(|| Self::build(NodeType::Uri, default, None, None));
        Self::build(NodeType::Literal, lexical, Some(datatype), None)
    }

    /// Create a blank node
    pub fn blank(s: &str) -> TrellisResult<Self> {
        Self::simple(NodeType::Blank, s)
    }

    /// Create a CURIE node
    ///
    /// Only emptiness is checked here; the `prefix:local` shape is validated
    /// when the CURIE is expanded against an [`Env`](crate::Env).
    pub fn curie(s: &str) -> TrellisResult<Self> {
        Self::simple(NodeType::Curie, s)
    }

    /// Create a URI node, which may be a relative reference
    pub fn uri(s: &str) -> TrellisResult<Self> {
        Self::simple(NodeType::Uri, s)
    }

    /// Create a variable node
    pub fn variable(s: &str) -> TrellisResult<Self> {
        Self::simple(NodeType::Variable, s)
    }

    /// Resolve a URI reference against an absolute base URI node
    pub fn resolved_uri(reference: &str, base: &Node) -> TrellisResult<Self> {
        if base.node_type() != NodeType::Uri || !uri::is_absolute(base.as_str()) {
            return Err(TrellisError::bad_arg(format!(
                "base '{}' is not an absolute URI",
                base.as_str()
            )));
        }
        let resolved = uri::resolve(reference, base.as_str());
        if !uri::is_absolute(&resolved) {
            return Err(TrellisError::bad_arg(format!(
                "'{}' did not resolve to an absolute URI",
                reference
            )));
        }
        Self::uri(&resolved)
    }

    /// Resolve this URI node against `base`
    pub fn resolve(&self, base: &Node) -> TrellisResult<Self> {
        if self.node_type() != NodeType::Uri {
            return Err(TrellisError::bad_arg(format!(
                "cannot resolve a {:?} node",
                self.node_type()
            )));
        }
        Self::resolved_uri(self.as_str(), base)
    }

    /// Express `uri` relative to `base`, staying under `root` if given
    pub fn relative_uri(uri: &str, base: &Node, root: Option<&Node>) -> TrellisResult<Self> {
        Self::uri(&uri::relativise(uri, base.as_str(), root.map(Node::as_str)))
    }

    /// Create a `file:` URI for a path, with an optional hostname
    ///
    /// Fails for an empty path.
    pub fn file_uri(path: &str, hostname: Option<&str>) -> TrellisResult<Self> {
        Self::uri(&uri::file_uri(path, hostname))
    }

    /// Create a canonical decimal literal
    ///
    /// `max_precision` caps significant digits (0 for no cap) and
    /// `max_frac_digits` caps digits after the point. Fails for NaN and
    /// infinities, which have no decimal form.
    pub fn decimal(
        value: f64,
        max_precision: u32,
        max_frac_digits: u32,
        datatype: Option<&Node>,
    ) -> TrellisResult<Self> {
        let lexical = numeric::decimal_lexical(value, max_precision, max_frac_digits)
            .ok_or_else(|| TrellisError::bad_arg(format!("{} has no decimal form", value)))?;
        Ok(Self::typed_with_default(lexical, datatype, xsd::DECIMAL))
    }

    /// Create a canonical `xsd:double` literal
    pub fn double(value: f64) -> Self {
        Self::typed_with_default(numeric::double_lexical(value), None, xsd::DOUBLE)
    }

    /// Create a canonical `xsd:float` literal
    pub fn float(value: f32) -> Self {
        Self::typed_with_default(numeric::float_lexical(value), None, xsd::FLOAT)
    }

    /// Create an integer literal, `xsd:integer` unless another datatype is given
    pub fn integer(value: i64, datatype: Option<&Node>) -> Self {
        Self::typed_with_default(value.to_string(), datatype, xsd::INTEGER)
    }

    /// Create an `xsd:boolean` literal
    pub fn boolean(value: bool) -> Self {
        Self::typed_with_default(value.to_string(), None, xsd::BOOLEAN)
    }

    /// Create a Base64 literal, `xsd:base64Binary` unless another datatype is given
    pub fn blob(bytes: &[u8], wrap_lines: bool, datatype: Option<&Node>) -> TrellisResult<Self> {
        if bytes.is_empty() {
            return Err(TrellisError::bad_arg("empty blob"));
        }
        Ok(Self::typed_with_default(
            blob::encode(bytes, wrap_lines),
            datatype,
            xsd::BASE64_BINARY,
        ))
    }

    // === Accessors ===

    pub fn node_type(&self) -> NodeType {
        self.0.node_type
    }

    /// The lexical string of this node
    pub fn as_str(&self) -> &str {
        &self.0.string
    }

    /// Byte length of the lexical string
    pub fn len(&self) -> usize {
        self.0.string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.string.is_empty()
    }

    pub fn datatype(&self) -> Option<&Node> {
        self.0.datatype.as_ref()
    }

    pub fn language(&self) -> Option<&Node> {
        self.0.language.as_ref()
    }

    pub fn flags(&self) -> NodeFlags {
        self.0.flags
    }

    /// Decode the bytes of a Base64 literal
    pub fn blob_bytes(&self) -> TrellisResult<Vec<u8>> {
        if self.node_type() != NodeType::Literal {
            return Err(TrellisError::bad_arg("only literals carry blob data"));
        }
        blob::decode(self.as_str())
    }

    /// Read this node's string as a floating point number, if it is one
    pub fn as_double(&self) -> Option<f64> {
        let (value, end) = numeric::parse_double(self.as_str());
        (end > 0 && end == self.len()).then_some(value)
    }

    /// True if both handles share one allocation
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this node's storage
    pub(crate) fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.0.node_type == other.0.node_type
            && self.0.string == other.0.string
            && self.0.datatype == other.0.datatype
            && self.0.language == other.0.language
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.0
            .node_type
            .cmp(&other.0.node_type)
            .then_with(|| self.0.string.cmp(&other.0.string))
            .then_with(|| self.0.datatype.cmp(&other.0.datatype))
            .then_with(|| self.0.language.cmp(&other.0.language))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.node_type.hash(state);
        self.0.string.hash(state);
        self.0.datatype.hash(state);
        self.0.language.hash(state);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self)
    }
}

/// Escape a string for an N-Triples style quoted literal
fn write_escaped(f: &mut std::fmt::Formatter<'_>, s: &str) -> std::fmt::Result {
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node_type() {
            NodeType::Uri => write!(f, "<{}>", self.as_str()),
            NodeType::Curie => f.write_str(self.as_str()),
            NodeType::Blank => write!(f, "_:{}", self.as_str()),
            NodeType::Variable => write!(f, "?{}", self.as_str()),
            NodeType::Literal => {
                f.write_str("\"")?;
                write_escaped(f, self.as_str())?;
                f.write_str("\"")?;
                if let Some(lang) = self.language() {
                    write!(f, "@{}", lang.as_str())
                } else if let Some(datatype) = self.datatype() {
                    write!(f, "^^{}", datatype)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Serialized form of a node
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeRepr {
    #[serde(rename = "type")]
    node_type: NodeType,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl From<Node> for NodeRepr {
    fn from(node: Node) -> Self {
        NodeRepr {
            node_type: node.node_type(),
            value: node.as_str().to_string(),
            datatype: node.datatype().map(|dt| dt.as_str().to_string()),
            language: node.language().map(|lang| lang.as_str().to_string()),
        }
    }
}

impl TryFrom<NodeRepr> for Node {
    type Error = TrellisError;

    fn try_from(repr: NodeRepr) -> Result<Self, Self::Error> {
        match repr.node_type {
            NodeType::Literal => {
                let datatype = repr
                    .datatype
                    .as_deref()
                    .map(|dt| {
                        if uri::is_absolute(dt) {
                            Node::uri(dt)
                        } else {
                            Node::curie(dt)
                        }
                    })
                    .transpose()?;
                Node::literal(&repr.value, datatype.as_ref(), repr.language.as_deref())
            }
            _ if repr.datatype.is_some() || repr.language.is_some() => Err(TrellisError::bad_arg(
                "only literals may have a datatype or language",
            )),
            node_type => Node::simple(node_type, &repr.value),
        }
    }
}
