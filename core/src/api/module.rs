//! Modules and their exported declarations.

use crate::diagnostics::DeclRef;
use crate::registry::TypeDecl;
use crate::{String, Vec};
use boundary_types::{FunctionSignature, TypeId};

/// What an exported declaration is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    /// A value of the given type. A value whose type is a function is
    /// planned like a function export.
    Value(TypeId),
    /// A function called through the boundary shim.
    Function(FunctionSignature),
}

/// One exported declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: ExportKind,
}

/// A compilation unit: the types it declares and the values it exports.
///
/// # Example
///
/// ```
/// use boundary_core::api::Module;
/// use boundary_types::{Field, TypeArena, TypeId};
///
/// let arena = TypeArena::new();
/// let coord = arena.record(vec![
///     Field::new("x", TypeId::FLOAT),
///     Field::new("y", TypeId::FLOAT),
/// ]);
///
/// let mut module = Module::new("Records");
/// module.declare_type("coord", coord);
/// module.export_value("origin", arena.named("Records", "coord", vec![]));
/// assert_eq!(module.exports().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    types: Vec<TypeDecl>,
    exports: Vec<Declaration>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            exports: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a type without parameters.
    pub fn declare_type(&mut self, name: impl Into<String>, body: TypeId) -> &mut Self {
        self.declare_generic(name, 0, body)
    }

    /// Declare a type whose body refers to its parameters as `Var(0..params)`.
    pub fn declare_generic(
        &mut self,
        name: impl Into<String>,
        params: u16,
        body: TypeId,
    ) -> &mut Self {
        self.types
            .push(TypeDecl::new(self.name.clone(), name, body).with_params(params));
        self
    }

    pub fn export_value(&mut self, name: impl Into<String>, ty: TypeId) -> &mut Self {
        self.exports.push(Declaration {
            name: name.into(),
            kind: ExportKind::Value(ty),
        });
        self
    }

    pub fn export_function(
        &mut self,
        name: impl Into<String>,
        signature: FunctionSignature,
    ) -> &mut Self {
        self.exports.push(Declaration {
            name: name.into(),
            kind: ExportKind::Function(signature),
        });
        self
    }

    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    pub fn exports(&self) -> &[Declaration] {
        &self.exports
    }

    pub fn decl_ref(&self, declaration: &Declaration) -> DeclRef {
        DeclRef::new(self.name.clone(), declaration.name.clone())
    }
}
