//! Pipeline inspection
//!
//! Runs a pattern through every stage (syntax tree, blocks, serialized text)
//! and keeps each intermediate result for debugging.

use crate::convert::{convert_pattern, parse_syntax};
use crate::error::Result;
use crate::flags::FlagSet;
use crate::node::Node;
use crate::serialize::serialize;

/// Parse a pattern and serialize it back, keeping every intermediate stage
///
/// # Example
/// ```
/// use regblocks::inspect;
///
/// let inspection = inspect("(a|b)", "").unwrap();
/// assert_eq!(inspection.output, "(a|b)");
/// assert!(inspection.round_trips());
/// ```
pub fn inspect(pattern: &str, flags: &str) -> Result<Inspection> {
    let flags = FlagSet::parse(flags);
    let syntax = parse_syntax(pattern, &flags)?;
    let nodes = convert_pattern(pattern, &flags, &syntax)?;
    let output = serialize(&nodes);

    Ok(Inspection {
        input: pattern.to_string(),
        flags,
        syntax_tree: format!("{:?}", syntax.ast),
        nodes,
        output,
    })
}

/// Every stage of a parse and re-serialization
#[derive(Debug, Clone)]
pub struct Inspection {
    /// The original pattern
    pub input: String,
    /// Normalized flags
    pub flags: FlagSet,
    /// The generic syntax tree (debug format)
    pub syntax_tree: String,
    /// The converted blocks
    pub nodes: Vec<Node>,
    /// The blocks serialized back to pattern text
    pub output: String,
}

impl Inspection {
    /// Whether serializing the blocks reproduced the input exactly
    pub fn round_trips(&self) -> bool {
        self.input == self.output
    }

    /// Print a formatted report of every stage
    pub fn report(&self) {
        println!("Conversion Report");
        println!("=================");
        println!("Input:  /{}/{}", self.input, self.flags);
        println!("Syntax: {}", self.syntax_tree);
        println!("Blocks: {}", self.nodes.len());
        for node in &self.nodes {
            println!("  {:<12} {}", node.kind_name(), node);
        }
        println!("Output: /{}/{}", self.output, self.flags);
        if !self.round_trips() {
            println!("Note:   output differs from input");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_stages() {
        let inspection = inspect(r"^\d+$", "m").unwrap();
        assert_eq!(inspection.input, r"^\d+$");
        assert_eq!(inspection.flags.to_string(), "m");
        assert!(inspection.syntax_tree.starts_with("Concat"));
        assert_eq!(inspection.nodes.len(), 3);
        assert_eq!(inspection.output, r"^\d+$");
        assert!(inspection.round_trips());
    }

    #[test]
    fn test_inspect_normalizing_pattern() {
        let inspection = inspect("a|b", "").unwrap();
        assert_eq!(inspection.output, "(?:a|b)");
        assert!(!inspection.round_trips());
        inspection.report();
    }

    #[test]
    fn test_inspect_error() {
        assert!(inspect("a{2,1}", "").is_err());
    }
}
