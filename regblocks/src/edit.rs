//! Structural edits on block trees
//!
//! A [`NodePath`] addresses one node inside a tree. Edits never touch their
//! input: each returns a new top-level sequence, leaving the original intact
//! for undo stacks and diffing.

use std::fmt;

use crate::error::ModelError;
use crate::node::Node;

/// One step of a [`NodePath`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// The node at this position of the top-level sequence, or of the
    /// children of the group or lookaround reached so far
    Index(usize),
    /// The node at `index` inside branch `branch` of the alternation reached so far
    Branch { branch: usize, index: usize },
}

/// Address of a node in a tree
///
/// The first step must be a [`Step::Index`] into the top-level sequence.
///
/// # Example
/// ```
/// use regblocks::{Node, NodePath, get_at};
///
/// let alt = Node::alternation(vec![vec![Node::literal("a")], vec![Node::literal("b")]]);
/// let nodes = vec![Node::group(true, None, vec![alt])];
/// let path = NodePath::new().child(0).child(0).branch(1, 0);
/// assert_eq!(get_at(&nodes, &path).unwrap(), &Node::literal("b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    steps: Vec<Step>,
}

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the path into a child sequence
    pub fn child(mut self, index: usize) -> Self {
        self.steps.push(Step::Index(index));
        self
    }

    /// Extend the path into an alternation branch
    pub fn branch(mut self, branch: usize, index: usize) -> Self {
        self.steps.push(Step::Branch { branch, index });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn invalid(&self) -> ModelError {
        ModelError::InvalidPath(self.to_string())
    }
}

impl From<Vec<Step>> for NodePath {
    fn from(steps: Vec<Step>) -> Self {
        NodePath { steps }
    }
}

/// Steps separated by `/`; branch steps are written `branch:index`
impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("<empty>");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i != 0 {
                f.write_str("/")?;
            }
            match step {
                Step::Index(index) => write!(f, "{}", index)?,
                Step::Branch { branch, index } => write!(f, "{}:{}", branch, index)?,
            }
        }
        Ok(())
    }
}

impl Node {
    fn inner(&self, step: Step) -> Option<(&Vec<Node>, usize)> {
        match (self, step) {
            (Node::Group { children, .. } | Node::Look { children, .. }, Step::Index(index)) => {
                Some((children, index))
            }
            (Node::Alternation { branches, .. }, Step::Branch { branch, index }) => {
                Some((branches.get(branch)?, index))
            }
            _ => None,
        }
    }

    fn inner_mut(&mut self, step: Step) -> Option<(&mut Vec<Node>, usize)> {
        match (self, step) {
            (Node::Group { children, .. } | Node::Look { children, .. }, Step::Index(index)) => {
                Some((children, index))
            }
            (Node::Alternation { branches, .. }, Step::Branch { branch, index }) => {
                Some((branches.get_mut(branch)?, index))
            }
            _ => None,
        }
    }
}

/// The sequence holding the addressed node, and the node's position in it.
/// The position is not bounds-checked.
fn locate_mut<'a>(
    nodes: &'a mut Vec<Node>,
    path: &NodePath,
) -> Option<(&'a mut Vec<Node>, usize)> {
    let (first, rest) = path.steps.split_first()?;
    let Step::Index(mut index) = *first else {
        return None;
    };
    let mut seq = nodes;
    for step in rest {
        let (next, at) = seq.get_mut(index)?.inner_mut(*step)?;
        seq = next;
        index = at;
    }
    Some((seq, index))
}

/// The node at `path`
pub fn get_at<'a>(nodes: &'a [Node], path: &NodePath) -> Result<&'a Node, ModelError> {
    let (first, rest) = path.steps.split_first().ok_or_else(|| path.invalid())?;
    let Step::Index(index) = *first else {
        return Err(path.invalid());
    };
    let mut node = nodes.get(index).ok_or_else(|| path.invalid())?;
    for step in rest {
        node = node
            .inner(*step)
            .and_then(|(seq, at)| seq.get(at))
            .ok_or_else(|| path.invalid())?;
    }
    Ok(node)
}

/// A copy of `nodes` with the node at `path` replaced
pub fn replace_at(nodes: &[Node], path: &NodePath, node: Node) -> Result<Vec<Node>, ModelError> {
    let mut edited = nodes.to_vec();
    let (seq, index) = locate_mut(&mut edited, path).ok_or_else(|| path.invalid())?;
    let slot = seq.get_mut(index).ok_or_else(|| path.invalid())?;
    *slot = node;
    Ok(edited)
}

/// A copy of `nodes` without the node at `path`
pub fn remove_at(nodes: &[Node], path: &NodePath) -> Result<Vec<Node>, ModelError> {
    let mut edited = nodes.to_vec();
    let (seq, index) = locate_mut(&mut edited, path).ok_or_else(|| path.invalid())?;
    if index >= seq.len() {
        return Err(path.invalid());
    }
    seq.remove(index);
    Ok(edited)
}

/// A copy of `nodes` with `node` inserted at `path`.
///
/// The last step may point one past the end of its sequence to append.
pub fn insert_at(nodes: &[Node], path: &NodePath, node: Node) -> Result<Vec<Node>, ModelError> {
    let mut edited = nodes.to_vec();
    let (seq, index) = locate_mut(&mut edited, path).ok_or_else(|| path.invalid())?;
    if index > seq.len() {
        return Err(path.invalid());
    }
    seq.insert(index, node);
    Ok(edited)
}

/// Whether `path` addresses an existing node
pub fn contains_path(nodes: &[Node], path: &NodePath) -> bool {
    get_at(nodes, path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{LookDirection, PredefKind, Quantifier};
    use crate::serialize::serialize;

    fn sample() -> Vec<Node> {
        // ^(a|\d+)(?=x)
        vec![
            Node::anchor(crate::node::AnchorKind::Start),
            Node::group(
                true,
                None,
                vec![Node::alternation(vec![
                    vec![Node::literal("a")],
                    vec![Node::predef(PredefKind::Digit)
                        .with_quant(Quantifier::OneOrMore { greedy: true })],
                ])],
            ),
            Node::look(LookDirection::Ahead, true, vec![Node::literal("x")]),
        ]
    }

    #[test]
    fn test_get_at() {
        let nodes = sample();
        let path = NodePath::new().child(1).child(0).branch(1, 0);
        assert!(matches!(
            get_at(&nodes, &path).unwrap(),
            Node::Predef { which: PredefKind::Digit, .. }
        ));
        assert_eq!(
            get_at(&nodes, &NodePath::new().child(2).child(0)).unwrap(),
            &Node::literal("x")
        );
    }

    #[test]
    fn test_replace_is_persistent() {
        let nodes = sample();
        let path = NodePath::new().child(1).child(0).branch(0, 0);
        let edited = replace_at(&nodes, &path, Node::literal("b")).unwrap();

        assert_eq!(serialize(&nodes), r"^(a|\d+)(?=x)");
        assert_eq!(serialize(&edited), r"^(b|\d+)(?=x)");
    }

    #[test]
    fn test_remove_at() {
        let nodes = sample();
        let edited = remove_at(&nodes, &NodePath::new().child(2).child(0)).unwrap();
        assert_eq!(serialize(&edited), r"^(a|\d+)(?=)");

        let edited = remove_at(&nodes, &NodePath::new().child(0)).unwrap();
        assert_eq!(serialize(&edited), r"(a|\d+)(?=x)");
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_insert_at_and_append() {
        let nodes = sample();
        let end = Node::anchor(crate::node::AnchorKind::End);
        let edited = insert_at(&nodes, &NodePath::new().child(3), end).unwrap();
        assert_eq!(serialize(&edited), r"^(a|\d+)(?=x)$");

        let edited = insert_at(
            &nodes,
            &NodePath::new().child(1).child(0).branch(0, 1),
            Node::literal("c"),
        )
        .unwrap();
        assert_eq!(serialize(&edited), r"^(ac|\d+)(?=x)");
    }

    #[test]
    fn test_invalid_paths() {
        let nodes = sample();
        let cases = [
            NodePath::new(),
            NodePath::new().child(9),
            NodePath::new().branch(0, 0),
            // anchors have no children
            NodePath::new().child(0).child(0),
            // alternations are entered by branch, not by index
            NodePath::new().child(1).child(0).child(0),
            NodePath::new().child(1).child(0).branch(5, 0),
        ];
        for path in cases {
            assert_eq!(
                get_at(&nodes, &path),
                Err(ModelError::InvalidPath(path.to_string()))
            );
            assert!(replace_at(&nodes, &path, Node::literal("z")).is_err());
            assert!(remove_at(&nodes, &path).is_err());
            assert!(!contains_path(&nodes, &path));
        }
        assert!(insert_at(&nodes, &NodePath::new().child(4), Node::literal("z")).is_err());
    }

    #[test]
    fn test_path_display() {
        let path = NodePath::new().child(1).child(0).branch(1, 2);
        assert_eq!(path.to_string(), "1/0/1:2");
        assert_eq!(NodePath::from(vec![Step::Index(3)]), NodePath::new().child(3));
        assert_eq!(NodePath::new().to_string(), "<empty>");
    }
}
