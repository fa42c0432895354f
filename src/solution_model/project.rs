//! Project nodes and the descriptor they wrap

use super::{validate_children, Classes, Node, NodeKind};
use crate::errors::Result;
use im::Vector;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Declared properties of a project, produced by the external solution
/// parser. The project node takes ownership of the descriptor as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    #[serde(default)]
    pub assembly_name: Option<String>,
    #[serde(default)]
    pub project_file: Option<PathBuf>,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assembly_name: None,
            project_file: None,
        }
    }
}

/// Root of one project's structural subtree
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectNode {
    properties: ProjectDescriptor,
    children: Vector<Node>,
}

impl ProjectNode {
    /// Wrap a descriptor as a childless project node
    pub fn from_descriptor(properties: ProjectDescriptor) -> Self {
        Self {
            properties,
            children: Vector::new(),
        }
    }

    pub fn new(
        properties: ProjectDescriptor,
        children: impl IntoIterator<Item = Node>,
    ) -> Result<Self> {
        let children: Vector<Node> = children.into_iter().collect();
        validate_children(NodeKind::Project, &children)?;
        Ok(Self {
            properties,
            children,
        })
    }

    /// New project node with the same descriptor and replacement children
    pub fn with_children(&self, children: impl IntoIterator<Item = Node>) -> Result<Self> {
        Self::new(self.properties.clone(), children)
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }

    pub fn properties(&self) -> &ProjectDescriptor {
        &self.properties
    }

    pub fn children(&self) -> &Vector<Node> {
        &self.children
    }

    /// All classes declared anywhere under this project's namespaces.
    /// A derived view over the tree, recomputed on each call.
    pub fn classes(&self) -> Classes<'_> {
        Classes::over(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution_model::ClassNode;
    use pretty_assertions::assert_eq;

    fn project_with(children: Vec<Node>) -> ProjectNode {
        ProjectNode::new(ProjectDescriptor::new("App"), children).unwrap()
    }

    #[test]
    fn from_descriptor_has_no_children() {
        let project = ProjectNode::from_descriptor(ProjectDescriptor::new("App"));
        assert_eq!(project.name(), "App");
        assert!(project.children().is_empty());
    }

    #[test]
    fn classes_concatenates_across_namespace_children() {
        let project = project_with(vec![
            Node::namespace("Core", vec![Node::class("Engine"), Node::class("State")]).unwrap(),
            Node::namespace(
                "Ui",
                vec![Node::namespace("Ui.Widgets", vec![Node::class("Button")]).unwrap()],
            )
            .unwrap(),
        ]);

        let names: Vec<&str> = project.classes().map(ClassNode::name).collect();
        assert_eq!(names, vec!["Engine", "State", "Button"]);
    }

    #[test]
    fn project_rejects_class_child() {
        let err = ProjectNode::new(ProjectDescriptor::new("App"), vec![Node::class("Loose")])
            .unwrap_err();
        assert!(matches!(err, crate::errors::Error::InvalidVariant { .. }));
    }

    #[test]
    fn with_children_keeps_descriptor() {
        let original = project_with(vec![]);
        let grown = original
            .with_children(vec![Node::namespace("Core", vec![]).unwrap()])
            .unwrap();
        assert_eq!(grown.properties(), original.properties());
        assert_eq!(grown.children().len(), 1);
        assert!(original.children().is_empty());
    }
}
