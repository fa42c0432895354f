//! Structural model of a parsed solution.
//!
//! A solution is a tree of Project → Namespace → Class nodes. Nodes are
//! immutable; structural change is expressed by building a new node with
//! replacement children via [`Node::with_children`]. Child legality is
//! enforced at construction time: a project holds only namespaces, a
//! namespace holds namespaces and classes, a class holds nothing.

pub mod project;

pub use project::{ProjectDescriptor, ProjectNode};

use crate::errors::{Error, Result};
use im::Vector;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

static NO_CHILDREN: Lazy<Vector<Node>> = Lazy::new(Vector::new);

/// A node in the structural tree of a solution
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    Project(ProjectNode),
    Namespace(NamespaceNode),
    Class(ClassNode),
}

impl Node {
    /// Convenience constructor for a namespace node
    pub fn namespace(
        name: impl Into<String>,
        children: impl IntoIterator<Item = Node>,
    ) -> Result<Node> {
        NamespaceNode::new(name, children).map(Node::Namespace)
    }

    /// Convenience constructor for a class node
    pub fn class(name: impl Into<String>) -> Node {
        Node::Class(ClassNode::new(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Project(project) => project.name(),
            Node::Namespace(namespace) => namespace.name(),
            Node::Class(class) => class.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Project(_) => NodeKind::Project,
            Node::Namespace(_) => NodeKind::Namespace,
            Node::Class(_) => NodeKind::Class,
        }
    }

    pub fn children(&self) -> &Vector<Node> {
        match self {
            Node::Project(project) => project.children(),
            Node::Namespace(namespace) => namespace.children(),
            Node::Class(_) => &NO_CHILDREN,
        }
    }

    /// Build a new node of the same variant with `children` in place of the
    /// current ones. The receiver is left untouched.
    pub fn with_children(&self, children: impl IntoIterator<Item = Node>) -> Result<Node> {
        match self {
            Node::Project(project) => project.with_children(children).map(Node::Project),
            Node::Namespace(namespace) => {
                NamespaceNode::new(namespace.name(), children).map(Node::Namespace)
            }
            Node::Class(class) => {
                let children: Vector<Node> = children.into_iter().collect();
                validate_children(NodeKind::Class, &children)?;
                Ok(Node::Class(class.clone()))
            }
        }
    }
}

/// The variant of a structural node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Project,
    Namespace,
    Class,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Project => "Project",
            NodeKind::Namespace => "Namespace",
            NodeKind::Class => "Class",
        }
    }

    fn allows_child(self, child: NodeKind) -> bool {
        match self {
            NodeKind::Project => child == NodeKind::Namespace,
            NodeKind::Namespace => matches!(child, NodeKind::Namespace | NodeKind::Class),
            NodeKind::Class => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject any child variant that is illegal under `parent`
pub(crate) fn validate_children(parent: NodeKind, children: &Vector<Node>) -> Result<()> {
    for child in children {
        if !parent.allows_child(child.kind()) {
            return Err(Error::invalid_variant(
                parent.as_str(),
                child.kind().as_str(),
            ));
        }
    }
    Ok(())
}

/// A namespace: a named group of nested namespaces and classes
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceNode {
    name: String,
    children: Vector<Node>,
}

impl NamespaceNode {
    pub fn new(name: impl Into<String>, children: impl IntoIterator<Item = Node>) -> Result<Self> {
        let children: Vector<Node> = children.into_iter().collect();
        validate_children(NodeKind::Namespace, &children)?;
        Ok(Self {
            name: name.into(),
            children,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &Vector<Node> {
        &self.children
    }

    /// All classes in this namespace subtree, in declaration order
    pub fn classes(&self) -> Classes<'_> {
        Classes::over(&self.children)
    }
}

/// A leaf unit of structure, the finest grain the benchmark clusters
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassNode {
    name: String,
}

impl ClassNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Depth-first, left-to-right walk over the classes of a subtree.
/// Recomputed on every call; holds no state beyond the traversal stack.
pub struct Classes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Classes<'a> {
    pub(crate) fn over(children: &'a Vector<Node>) -> Self {
        Self {
            stack: children.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Classes<'a> {
    type Item = &'a ClassNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Class(class) => return Some(class),
                other => self.stack.extend(other.children().iter().rev()),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn namespace(name: &str, children: Vec<Node>) -> Node {
        Node::namespace(name, children).unwrap()
    }

    #[test]
    fn with_children_replaces_without_mutating_receiver() {
        let original = namespace("Core", vec![Node::class("Parser")]);
        let replaced = original
            .with_children(vec![Node::class("Lexer"), Node::class("Token")])
            .unwrap();

        let names: Vec<&str> = replaced.children().iter().map(Node::name).collect();
        assert_eq!(names, vec!["Lexer", "Token"]);

        let original_names: Vec<&str> = original.children().iter().map(Node::name).collect();
        assert_eq!(original_names, vec!["Parser"]);
    }

    #[test]
    fn namespace_rejects_project_child() {
        let project = Node::Project(ProjectNode::from_descriptor(ProjectDescriptor::new("App")));
        let err = Node::namespace("Core", vec![project]).unwrap_err();
        assert!(matches!(err, Error::InvalidVariant { .. }));
    }

    #[test]
    fn class_rejects_any_child() {
        let class = Node::class("Parser");
        let err = class.with_children(vec![Node::class("Inner")]).unwrap_err();
        assert!(matches!(err, Error::InvalidVariant { .. }));
    }

    #[test]
    fn class_with_empty_children_is_identity() {
        let class = Node::class("Parser");
        let same = class.with_children(Vec::new()).unwrap();
        assert_eq!(class, same);
    }

    #[test]
    fn classes_walks_nested_namespaces_in_order() {
        let tree = namespace(
            "Root",
            vec![
                namespace(
                    "A",
                    vec![
                        Node::class("A1"),
                        namespace("A.Inner", vec![Node::class("A2")]),
                    ],
                ),
                namespace("B", vec![Node::class("B1")]),
            ],
        );

        let Node::Namespace(root) = &tree else {
            unreachable!()
        };
        let names: Vec<&str> = root.classes().map(ClassNode::name).collect();
        assert_eq!(names, vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn classes_is_recomputed_per_call() {
        let root = NamespaceNode::new("Root", vec![Node::class("C")]).unwrap();
        assert_eq!(root.classes().count(), 1);
        assert_eq!(root.classes().count(), 1);
    }
}
