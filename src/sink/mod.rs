//! Sink trait and statement flags
//!
//! A sink is the interface through which statement producers (readers,
//! ranges) push data into a consumer (a model inserter, a writer). Every
//! callback returns a result; an `Err` aborts the producing stream and is
//! propagated unchanged.

mod inserter;
mod syntax;

pub use inserter::Inserter;
pub use syntax::Syntax;

use crate::error::TrellisResult;
use crate::node::Node;
use crate::statement::Statement;

/// Abbreviation hints attached to a streamed statement
///
/// Producers set these to describe how a statement appeared in (or should
/// be written to) a document; the core passes them through uninterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatementFlags(u32);

impl StatementFlags {
    /// Empty blank node subject
    pub const EMPTY_S: StatementFlags = StatementFlags(1);
    /// Start of anonymous subject
    pub const ANON_S: StatementFlags = StatementFlags(1 << 1);
    /// Start of anonymous object
    pub const ANON_O: StatementFlags = StatementFlags(1 << 2);
    /// Start of list subject
    pub const LIST_S: StatementFlags = StatementFlags(1 << 3);
    /// Start of list object
    pub const LIST_O: StatementFlags = StatementFlags(1 << 4);
    /// Start of terse subject
    pub const TERSE_S: StatementFlags = StatementFlags(1 << 5);
    /// Start of terse object
    pub const TERSE_O: StatementFlags = StatementFlags(1 << 6);

    pub const fn empty() -> Self {
        StatementFlags(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        StatementFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: StatementFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for StatementFlags {
    type Output = StatementFlags;

    fn bitor(self, rhs: StatementFlags) -> StatementFlags {
        StatementFlags(self.0 | rhs.0)
    }
}

/// Consumer of a stream of RDF events.
pub trait Sink {
    /// The base URI changed
    fn on_base(&mut self, _uri: &Node) -> TrellisResult<()> {
        Ok(())
    }

    /// A namespace prefix was defined
    fn on_prefix(&mut self, _name: &Node, _uri: &Node) -> TrellisResult<()> {
        Ok(())
    }

    /// A statement was produced
    fn on_statement(&mut self, flags: StatementFlags, statement: &Statement) -> TrellisResult<()>;

    /// An anonymous node description ended
    fn on_end(&mut self, _node: &Node) -> TrellisResult<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn on_base(&mut self, uri: &Node) -> TrellisResult<()> {
        (**self).on_base(uri)
    }

    fn on_prefix(&mut self, name: &Node, uri: &Node) -> TrellisResult<()> {
        (**self).on_prefix(name, uri)
    }

    fn on_statement(&mut self, flags: StatementFlags, statement: &Statement) -> TrellisResult<()> {
        (**self).on_statement(flags, statement)
    }

    fn on_end(&mut self, node: &Node) -> TrellisResult<()> {
        (**self).on_end(node)
    }
}

/// Sink that collects everything it receives, mainly for tests and piping
#[derive(Debug, Default, Clone)]
pub struct CollectSink {
    pub base: Option<Node>,
    pub prefixes: Vec<(Node, Node)>,
    pub statements: Vec<(StatementFlags, Statement)>,
    pub ends: Vec<Node>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for CollectSink {
    fn on_base(&mut self, uri: &Node) -> TrellisResult<()> {
        self.base = Some(uri.clone());
        Ok(())
    }

    fn on_prefix(&mut self, name: &Node, uri: &Node) -> TrellisResult<()> {
        self.prefixes.push((name.clone(), uri.clone()));
        Ok(())
    }

    fn on_statement(&mut self, flags: StatementFlags, statement: &Statement) -> TrellisResult<()> {
        self.statements.push((flags, statement.clone()));
        Ok(())
    }

    fn on_end(&mut self, node: &Node) -> TrellisResult<()> {
        self.ends.push(node.clone());
        Ok(())
    }
}
