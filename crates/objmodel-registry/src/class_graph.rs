//! Inheritance graph.
//!
//! Uses `petgraph::DiGraph` with one node per class and an edge from each
//! base class to its derived class, so a topological order lists every
//! base before the classes deriving from it.

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use objmodel_core::{RegistrationError, TypeHash};

use crate::SymbolRegistry;

/// The inheritance relation of every registered class.
#[derive(Debug)]
pub struct ClassGraph {
    graph: DiGraph<TypeHash, ()>,
    nodes: FxHashMap<TypeHash, NodeIndex>,
}

impl ClassGraph {
    /// Build the graph from the registry.
    ///
    /// Fails if a class names a base that was never declared.
    pub fn build(registry: &SymbolRegistry) -> Result<Self, RegistrationError> {
        let mut graph = DiGraph::new();
        let mut nodes = FxHashMap::default();

        for class in registry.classes() {
            nodes.insert(class.type_hash, graph.add_node(class.type_hash));
        }

        for class in registry.classes() {
            let Some(base) = class.base_class else {
                continue;
            };
            let base_node = nodes.get(&base).copied().ok_or_else(|| {
                RegistrationError::TypeNotFound(format!(
                    "base class {} of '{}'",
                    registry.type_name(base),
                    class.name
                ))
            })?;
            let derived_node = nodes[&class.type_hash];
            graph.add_edge(base_node, derived_node, ());
        }

        Ok(Self { graph, nodes })
    }

    /// Classes ordered base before derived.
    pub fn topological_order(&self, registry: &SymbolRegistry) -> Result<Vec<TypeHash>, RegistrationError> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|n| self.graph[n]).collect())
            .map_err(|cycle| {
                RegistrationError::CircularInheritance(registry.type_name(self.graph[cycle.node_id()]))
            })
    }

    /// Classes deriving directly from `class`.
    pub fn direct_subclasses(&self, class: TypeHash) -> Vec<TypeHash> {
        let Some(&node) = self.nodes.get(&class) else {
            return Vec::new();
        };
        let mut subclasses: Vec<TypeHash> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        subclasses.sort();
        subclasses
    }

    /// Classes with no base.
    pub fn roots(&self) -> Vec<TypeHash> {
        self.graph
            .externals(Direction::Incoming)
            .map(|n| self.graph[n])
            .collect()
    }

    /// Number of classes in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph has no classes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objmodel_core::ClassDecl;

    #[test]
    fn bases_come_first() {
        let mut registry = SymbolRegistry::new();
        // declared derived-first on purpose
        registry.declare_class(ClassDecl::new("B").with_base("C")).unwrap();
        registry.declare_class(ClassDecl::new("C").with_base("A")).unwrap();
        registry.declare_class(ClassDecl::new("A")).unwrap();

        let graph = ClassGraph::build(&registry).unwrap();
        let order = graph.topological_order(&registry).unwrap();
        let pos = |name: &str| order.iter().position(|h| *h == TypeHash::from_name(name)).unwrap();
        assert!(pos("A") < pos("C"));
        assert!(pos("C") < pos("B"));
        assert_eq!(graph.roots(), vec![TypeHash::from_name("A")]);
        assert_eq!(graph.direct_subclasses(TypeHash::from_name("A")), vec![TypeHash::from_name("C")]);
    }

    #[test]
    fn cycle_is_reported() {
        let mut registry = SymbolRegistry::new();
        registry.declare_class(ClassDecl::new("X").with_base("Y")).unwrap();
        registry.declare_class(ClassDecl::new("Y").with_base("X")).unwrap();
        let graph = ClassGraph::build(&registry).unwrap();
        assert!(matches!(
            graph.topological_order(&registry),
            Err(RegistrationError::CircularInheritance(_))
        ));
    }

    #[test]
    fn unknown_base_is_reported() {
        let mut registry = SymbolRegistry::new();
        registry.declare_class(ClassDecl::new("D").with_base("Missing")).unwrap();
        assert!(matches!(
            ClassGraph::build(&registry),
            Err(RegistrationError::TypeNotFound(_))
        ));
    }
}
