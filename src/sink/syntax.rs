//! Concrete syntax tags exchanged with external readers and writers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TrellisError;

/// RDF document syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Syntax {
    /// No syntax (empty documents)
    #[default]
    Empty = 0,
    /// Terse triples
    Turtle = 1,
    /// Line-based triples
    NTriples = 2,
    /// Line-based quads
    NQuads = 3,
    /// Terse quads
    TriG = 4,
}

impl Syntax {
    /// All tags, in numeric order
    pub const ALL: [Syntax; 5] = [
        Syntax::Empty,
        Syntax::Turtle,
        Syntax::NTriples,
        Syntax::NQuads,
        Syntax::TriG,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Syntax::Empty => "empty",
            Syntax::Turtle => "turtle",
            Syntax::NTriples => "ntriples",
            Syntax::NQuads => "nquads",
            Syntax::TriG => "trig",
        }
    }

    /// Look up a syntax by case-insensitive name
    pub fn by_name(name: &str) -> Option<Syntax> {
        Self::ALL
            .into_iter()
            .find(|syntax| syntax.name().eq_ignore_ascii_case(name))
    }

    /// Guess a syntax from a filename's extension
    pub fn guess(filename: &str) -> Option<Syntax> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "ttl" => Some(Syntax::Turtle),
            "nt" => Some(Syntax::NTriples),
            "nq" => Some(Syntax::NQuads),
            "trig" => Some(Syntax::TriG),
            _ => None,
        }
    }

    /// Whether documents in this syntax can carry named graphs
    pub fn has_graphs(&self) -> bool {
        matches!(self, Syntax::NQuads | Syntax::TriG)
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Syntax {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name(s).ok_or_else(|| TrellisError::bad_arg(format!("unknown syntax '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Syntax::by_name("turtle"), Some(Syntax::Turtle));
        assert_eq!(Syntax::by_name("NQuads"), Some(Syntax::NQuads));
        assert_eq!(Syntax::by_name("rdfxml"), None);
        assert_eq!("trig".parse::<Syntax>().unwrap(), Syntax::TriG);
    }

    #[test]
    fn test_guess_from_extension() {
        assert_eq!(Syntax::guess("data.ttl"), Some(Syntax::Turtle));
        assert_eq!(Syntax::guess("/path/to/dump.NQ"), Some(Syntax::NQuads));
        assert_eq!(Syntax::guess("graph.trig"), Some(Syntax::TriG));
        assert_eq!(Syntax::guess("noextension"), None);
        assert_eq!(Syntax::guess("notes.txt"), None);
    }

    #[test]
    fn test_graph_capable_syntaxes() {
        assert!(Syntax::TriG.has_graphs());
        assert!(Syntax::NQuads.has_graphs());
        assert!(!Syntax::Turtle.has_graphs());
        assert!(!Syntax::Empty.has_graphs());
    }

    #[test]
    fn test_numeric_tags() {
        assert_eq!(Syntax::Empty as u8, 0);
        assert_eq!(Syntax::TriG as u8, 4);
    }
}
