//! Dependency graphs and the filters that select nodes from them.
//!
//! A [`ResolverService`](super::ResolverService) returns a [`DependencyGraph`] whose root is
//! the requested dependency. [`DependencyGraph::flatten`] walks it in preorder (root
//! first, children in declaration order) and keeps the nodes a [`DependencyFilter`]
//! accepts. A rejected node's subtree is still visited, so a filter decides per node and
//! never prunes.

use crate::artifact::{Artifact, Dependency, Scope};
use crate::core::Result;
use std::collections::HashSet;

/// A node of a collected dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub dependency: Dependency,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn new(dependency: Dependency) -> Self {
        Self {
            dependency,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: DependencyNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn artifact(&self) -> &Artifact {
        &self.dependency.artifact
    }
}

/// The transitive closure of a single root dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    pub root: DependencyNode,
}

impl DependencyGraph {
    pub fn new(root: DependencyNode) -> Self {
        Self { root }
    }

    /// Preorder walk collecting every node `filter` accepts.
    pub fn flatten<'a>(&'a self, filter: &dyn DependencyFilter) -> Vec<&'a DependencyNode> {
        let mut accepted = Vec::new();
        let mut parents = Vec::new();
        visit(&self.root, filter, &mut parents, &mut accepted);
        accepted
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &DependencyNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}

fn visit<'a>(
    node: &'a DependencyNode,
    filter: &dyn DependencyFilter,
    parents: &mut Vec<&'a DependencyNode>,
    accepted: &mut Vec<&'a DependencyNode>,
) {
    if filter.accept(node, parents) {
        accepted.push(node);
    }
    parents.push(node);
    for child in &node.children {
        visit(child, filter, parents, accepted);
    }
    parents.pop();
}

/// Decides whether a graph node contributes an artifact.
///
/// `parents` lists the ancestors of `node`, nearest last.
pub trait DependencyFilter: Send + Sync {
    fn accept(&self, node: &DependencyNode, parents: &[&DependencyNode]) -> bool;
}

/// Accepts nodes whose scope is on the classpath of a requested scope.
#[derive(Debug, Clone)]
pub struct ScopeDependencyFilter {
    included: HashSet<Scope>,
}

impl ScopeDependencyFilter {
    /// Filter for the classpath of `scope`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigurationError`](crate::core::ResolveError::ConfigurationError) for
    /// `import`, which has no classpath.
    pub fn classpath(scope: Scope) -> Result<Self> {
        Ok(Self {
            included: scope.classpath_scopes()?.iter().copied().collect(),
        })
    }
}

impl DependencyFilter for ScopeDependencyFilter {
    fn accept(&self, node: &DependencyNode, _parents: &[&DependencyNode]) -> bool {
        self.included.contains(&node.dependency.scope)
    }
}

/// Rejects optional dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonOptionalFilter;

impl DependencyFilter for NonOptionalFilter {
    fn accept(&self, node: &DependencyNode, _parents: &[&DependencyNode]) -> bool {
        !node.dependency.optional
    }
}

/// Accepts a node only when every inner filter does.
#[derive(Default)]
pub struct AndFilter {
    filters: Vec<Box<dyn DependencyFilter>>,
}

impl AndFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn and(mut self, filter: impl DependencyFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl DependencyFilter for AndFilter {
    fn accept(&self, node: &DependencyNode, parents: &[&DependencyNode]) -> bool {
        self.filters.iter().all(|f| f.accept(node, parents))
    }
}
