//! Sink that inserts streamed statements into a model

use super::{Sink, StatementFlags};
use crate::env::Env;
use crate::error::{TrellisError, TrellisResult};
use crate::model::Model;
use crate::node::{Node, NodeType};
use crate::statement::Statement;
use crate::world::BLANK_PREFIX;

/// Feeds a stream of statements into a [`Model`].
///
/// Prefix and base events update the inserter's own [`Env`], which is used
/// to expand CURIEs and resolve relative URIs before insertion. Statements
/// without a graph are placed in the default graph, if one is set.
pub struct Inserter<'a> {
    model: &'a mut Model,
    env: Env,
    default_graph: Option<Node>,
    blank_prefix: Option<String>,
}

impl<'a> Inserter<'a> {
    pub fn new(model: &'a mut Model, env: Env) -> Self {
        Self {
            model,
            env,
            default_graph: None,
            blank_prefix: None,
        }
    }

    /// Put statements that name no graph into `graph`
    pub fn with_default_graph(mut self, graph: Node) -> Self {
        self.default_graph = Some(graph);
        self
    }

    /// Prepend `prefix` to every blank node label read from the stream
    pub fn with_blank_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_prefix = Some(prefix.into());
        self
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    fn blank(&self, label: &str) -> TrellisResult<Node> {
        if let Some(prefix) = &self.blank_prefix {
            return Node::blank(&format!("{}{}", prefix, label));
        }
        // Labels shaped like world-issued ids could collide with generated nodes
        let issued = label
            .strip_prefix(BLANK_PREFIX)
            .and_then(|digits| digits.parse::<u32>().ok())
            .is_some_and(|id| id > 0 && id <= self.model.world().last_blank_id());
        if issued {
            return Err(TrellisError::IdClash(label.to_string()));
        }
        Node::blank(label)
    }

    fn normalise(&self, node: &Node) -> TrellisResult<Node> {
        match node.node_type() {
            NodeType::Blank => self.blank(node.as_str()),
            NodeType::Variable => Err(TrellisError::Invalid(format!(
                "variable {} cannot be stored",
                node
            ))),
            _ => self.env.normalise(node),
        }
    }

    fn prepare(&self, statement: &Statement) -> TrellisResult<Statement> {
        let normal = statement.map_nodes(|node| self.normalise(node))?;
        if normal.graph().is_some() || self.default_graph.is_none() {
            return Ok(normal);
        }
        let placed = Statement::new(
            normal.subject().clone(),
            normal.predicate().clone(),
            normal.object().clone(),
            self.default_graph.clone(),
        )?;
        Ok(match normal.cursor() {
            Some(cursor) => placed.with_cursor(cursor.clone()),
            None => placed,
        })
    }
}

impl Sink for Inserter<'_> {
    fn on_base(&mut self, uri: &Node) -> TrellisResult<()> {
        self.env.set_base_uri(Some(uri)).inspect_err(|e| {
            tracing::warn!(uri = uri.as_str(), error = %e, "rejected base URI");
        })
    }

    fn on_prefix(&mut self, name: &Node, uri: &Node) -> TrellisResult<()> {
        self.env.set_prefix(name, uri).inspect_err(|e| {
            tracing::warn!(prefix = name.as_str(), error = %e, "rejected prefix");
        })
    }

    fn on_statement(&mut self, _flags: StatementFlags, statement: &Statement) -> TrellisResult<()> {
        let prepared = self.prepare(statement).inspect_err(|e| {
            tracing::warn!(statement = %statement, error = %e, "rejected statement");
        })?;
        self.model.insert(&prepared)?;
        Ok(())
    }
}
