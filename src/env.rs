//! Lexical environment: a base URI and namespace prefixes
//!
//! An [`Env`] converts between CURIEs and full URIs and resolves relative
//! URI references against its base.

use crate::error::{TrellisError, TrellisResult};
use crate::node::{is_absolute_uri, Node, NodeType};
use crate::sink::Sink;

/// Base URI plus an ordered list of prefix mappings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Env {
    base_uri: Option<Node>,
    prefixes: Vec<(Node, Node)>,
}

impl Env {
    /// Create an environment, optionally with an absolute base URI
    pub fn new(base_uri: Option<&Node>) -> Self {
        let mut env = Self::default();
        if let Some(base) = base_uri {
            if env.set_base_uri(Some(base)).is_err() {
                tracing::warn!(base = base.as_str(), "ignoring invalid base URI");
            }
        }
        env
    }

    pub fn base_uri(&self) -> Option<&Node> {
        self.base_uri.as_ref()
    }

    /// Set or clear the base URI; a relative URI resolves against the current base
    pub fn set_base_uri(&mut self, uri: Option<&Node>) -> TrellisResult<()> {
        let Some(uri) = uri else {
            self.base_uri = None;
            return Ok(());
        };
        if uri.node_type() != NodeType::Uri {
            return Err(TrellisError::bad_arg(format!(
                "base must be a URI, not {:?}",
                uri.node_type()
            )));
        }
        self.base_uri = Some(self.resolve(uri)?);
        Ok(())
    }

    fn resolve(&self, uri: &Node) -> TrellisResult<Node> {
        if is_absolute_uri(uri.as_str()) {
            return Ok(uri.clone());
        }
        match &self.base_uri {
            Some(base) => Node::resolved_uri(uri.as_str(), base),
            None => Err(TrellisError::bad_arg(format!(
                "cannot resolve '{}' without a base URI",
                uri.as_str()
            ))),
        }
    }

    /// Prefix mappings in definition order
    pub fn prefixes(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.prefixes.iter().map(|(name, uri)| (name, uri))
    }

    /// Define or redefine a prefix
    pub fn set_prefix(&mut self, name: &Node, uri: &Node) -> TrellisResult<()> {
        if uri.node_type() != NodeType::Uri {
            return Err(TrellisError::bad_arg(format!(
                "prefix '{}' must map to a URI",
                name.as_str()
            )));
        }
        let uri = self.resolve(uri)?;
        match self.prefixes.iter_mut().find(|(n, _)| n.as_str() == name.as_str()) {
            Some(entry) => entry.1 = uri,
            None => self.prefixes.push((Node::string(name.as_str()), uri)),
        }
        Ok(())
    }

    pub fn set_prefix_from_strings(&mut self, name: &str, uri: &str) -> TrellisResult<()> {
        self.set_prefix(&Node::string(name), &Node::uri(uri)?)
    }

    fn find_prefix(&self, name: &str) -> Option<&Node> {
        self.prefixes
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, uri)| uri)
    }

    /// Shorten a URI to a CURIE using the longest matching namespace
    pub fn qualify(&self, uri: &Node) -> Option<Node> {
        if uri.node_type() != NodeType::Uri {
            return None;
        }
        let (name, namespace) = self
            .prefixes
            .iter()
            .filter(|(_, ns)| uri.len() > ns.len() && uri.as_str().starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())?;
        let local = &uri.as_str()[namespace.len()..];
        Node::curie(&format!("{}:{}", name.as_str(), local)).ok()
    }

    fn expand_curie(&self, curie: &str) -> TrellisResult<String> {
        let (name, local) = curie
            .split_once(':')
            .ok_or_else(|| TrellisError::BadCurie(format!("'{}' has no prefix", curie)))?;
        let namespace = self
            .find_prefix(name)
            .ok_or_else(|| TrellisError::BadCurie(format!("undefined prefix '{}'", name)))?;
        Ok(format!("{}{}", namespace.as_str(), local))
    }

    /// Expand a CURIE or a relative URI to a full URI.
    ///
    /// Returns `None` for absolute URIs, other node types, undefined
    /// prefixes, and relative URIs with no base to resolve against.
    pub fn expand(&self, node: &Node) -> Option<Node> {
        match node.node_type() {
            NodeType::Curie => self
                .expand_curie(node.as_str())
                .ok()
                .and_then(|s| Node::uri(&s).ok()),
            NodeType::Uri if !is_absolute_uri(node.as_str()) => self.resolve(node).ok(),
            _ => None,
        }
    }

    /// Fully expand a node, including a typed literal's CURIE datatype.
    ///
    /// Unlike [`Env::expand`], this returns the node unchanged when there is
    /// nothing to expand and reports why expansion failed.
    pub fn normalise(&self, node: &Node) -> TrellisResult<Node> {
        match node.node_type() {
            NodeType::Curie => Node::uri(&self.expand_curie(node.as_str())?),
            NodeType::Uri => self.resolve(node),
            NodeType::Literal => match node.datatype() {
                Some(dt) => {
                    let expanded = self.normalise(dt)?;
                    if expanded.ptr_eq(dt) {
                        Ok(node.clone())
                    } else {
                        Node::typed_literal(node.as_str(), Some(&expanded))
                    }
                }
                None => Ok(node.clone()),
            },
            NodeType::Blank | NodeType::Variable => Ok(node.clone()),
        }
    }

    /// Emit every prefix mapping to a sink
    pub fn write_prefixes(&self, sink: &mut dyn Sink) -> TrellisResult<()> {
        for (name, uri) in &self.prefixes {
            sink.on_prefix(name, uri)?;
        }
        Ok(())
    }
}
