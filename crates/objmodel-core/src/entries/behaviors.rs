//! Lifecycle behaviors of a class: constructors, assignment operators and
//! the destructor.

use crate::TypeHash;

/// Lifecycle function hashes of a class.
///
/// The functions themselves live in the registry; this only records which
/// ones belong to the class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Behaviors {
    /// Constructors, user-declared and implicit.
    pub constructors: Vec<TypeHash>,
    /// Assignment operators, user-declared and implicit.
    pub assignments: Vec<TypeHash>,
    /// The destructor, if declared.
    pub destructor: Option<TypeHash>,
}

impl Behaviors {
    /// Create empty behaviors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constructor.
    pub fn add_constructor(&mut self, func_hash: TypeHash) {
        self.constructors.push(func_hash);
    }

    /// Add an assignment operator.
    pub fn add_assignment(&mut self, func_hash: TypeHash) {
        self.assignments.push(func_hash);
    }

    /// Whether any constructor is declared.
    pub fn has_constructors(&self) -> bool {
        !self.constructors.is_empty()
    }

    /// Whether a destructor is declared.
    pub fn has_destructor(&self) -> bool {
        self.destructor.is_some()
    }
}
