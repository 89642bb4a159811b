//! Type lowering: type annotation syntax → `Type`.
//!
//! The parser hands the checker `TypeAnnotationNode`s; lowering resolves the
//! names they mention against a `TypeScope` and the declarations table and
//! builds the corresponding `Type` values, validating restricted types and
//! resource annotations on the way.
//!
//! Lowering never fails. Errors are collected and the offending node lowers
//! to `Never`, so checking can continue with a type that is a subtype of
//! everything and produces no follow-up errors.

use crate::def::{DeclarationTable, DefId};
use crate::diagnostics::TypeError;
use crate::format::{TypeFormatter, simple_name};
use crate::options::SolverOptions;
use crate::resource::check_resource_annotation;
use crate::restricted::RestrictedType;
use crate::types::{
    CompositeKind, FunctionType, NumericType, Parameter, Type, TypeAnnotation, TypeParameter,
};
use rsl_common::Range;
use rsl_common::limits::{MAX_QUALIFIED_NAME_DEPTH, MAX_TYPE_ANNOTATION_DEPTH};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tracing::trace;

// =============================================================================
// Syntax
// =============================================================================

/// Type syntax as produced by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeNode {
    /// `R`, or a nested type path `Outer.Inner`.
    Nominal { path: Vec<String>, range: Range },
    Optional { inner: Box<TypeNode>, range: Range },
    VariableSized { element: Box<TypeNode>, range: Range },
    ConstantSized {
        element: Box<TypeNode>,
        size: u64,
        range: Range,
    },
    Dictionary {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
        range: Range,
    },
    Function {
        type_parameters: Vec<TypeParameterNode>,
        parameters: Vec<ParameterNode>,
        return_annotation: Box<TypeAnnotationNode>,
        range: Range,
    },
    /// `R{I1, I2}`, or `{I1, I2}` with the base left implicit.
    Restricted {
        base: Option<Box<TypeNode>>,
        restrictions: Vec<TypeNode>,
        range: Range,
    },
    Reference {
        authorized: bool,
        referenced: Box<TypeNode>,
        range: Range,
    },
}

impl TypeNode {
    /// A single (non-nested) name.
    pub fn name(name: &str, range: Range) -> Self {
        Self::Nominal {
            path: vec![name.to_string()],
            range,
        }
    }

    pub const fn range(&self) -> Range {
        match self {
            Self::Nominal { range, .. }
            | Self::Optional { range, .. }
            | Self::VariableSized { range, .. }
            | Self::ConstantSized { range, .. }
            | Self::Dictionary { range, .. }
            | Self::Function { range, .. }
            | Self::Restricted { range, .. }
            | Self::Reference { range, .. } => *range,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAnnotationNode {
    pub is_resource: bool,
    pub ty: TypeNode,
    pub range: Range,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterNode {
    pub label: Option<String>,
    pub identifier: Option<String>,
    pub annotation: TypeAnnotationNode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameterNode {
    pub name: String,
    pub bound: Option<TypeNode>,
}

// =============================================================================
// TypeScope
// =============================================================================

/// Type names visible at a use site.
#[derive(Clone, Debug, Default)]
pub struct TypeScope {
    types: FxHashMap<String, Type>,
}

impl TypeScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope holding every built-in type name.
    pub fn with_builtins() -> Self {
        let mut scope = Self::new();
        for numeric in NumericType::ALL {
            scope.declare(numeric.name(), Type::Numeric(numeric));
        }
        for ty in [
            Type::String,
            Type::Character,
            Type::Address,
            Type::Bool,
            Type::Void,
            Type::Never,
            Type::AnyStruct,
            Type::AnyResource,
        ] {
            scope.declare(simple_name(&ty), ty);
        }
        scope
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: Type) {
        self.types.insert(name.into(), ty);
    }

    /// Make a registered declaration visible under its own identifier.
    pub fn declare_def(&mut self, db: &DeclarationTable, def: DefId) {
        if let Some(ty) = db.type_of(def) {
            self.declare(db.identifier(def), ty);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }
}

// =============================================================================
// TypeLowering
// =============================================================================

/// Type lowering context.
pub struct TypeLowering<'a> {
    db: &'a DeclarationTable,
    scope: &'a TypeScope,
    options: SolverOptions,
    type_param_scopes: RefCell<Vec<Vec<Arc<TypeParameter>>>>,
    depth: Cell<u32>,
    diagnostics: RefCell<Vec<TypeError>>,
}

impl<'a> TypeLowering<'a> {
    pub fn new(db: &'a DeclarationTable, scope: &'a TypeScope) -> Self {
        Self::with_options(db, scope, SolverOptions::default())
    }

    pub fn with_options(db: &'a DeclarationTable, scope: &'a TypeScope, options: SolverOptions) -> Self {
        Self {
            db,
            scope,
            options,
            type_param_scopes: RefCell::new(Vec::new()),
            depth: Cell::new(0),
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Errors collected so far, leaving the context empty.
    pub fn take_diagnostics(&self) -> Vec<TypeError> {
        self.diagnostics.take()
    }

    fn diagnostic_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    fn report(&self, error: TypeError) {
        trace!(code = error.code(), "TypeLowering::report");
        self.diagnostics.borrow_mut().push(error);
    }

    /// Lower an annotation and check its `@` marker.
    pub fn lower_annotation(&self, node: &TypeAnnotationNode) -> TypeAnnotation {
        let reported = self.diagnostic_count();
        let annotation = TypeAnnotation {
            is_resource: node.is_resource,
            ty: self.lower_type(&node.ty),
        };
        // A type that failed to lower already carries its error.
        if self.diagnostic_count() == reported
            && let Err(error) = check_resource_annotation(self.db, &annotation, node.range)
        {
            self.report(error);
        }
        annotation
    }

    pub fn lower_type(&self, node: &TypeNode) -> Type {
        let depth = self.depth.get() + 1;
        if depth > MAX_TYPE_ANNOTATION_DEPTH {
            self.report(TypeError::TypeAnnotationTooDeep {
                range: node.range(),
            });
            return Type::Never;
        }
        self.depth.set(depth);
        let ty = self.lower_type_inner(node);
        self.depth.set(depth - 1);
        ty
    }

    fn lower_type_inner(&self, node: &TypeNode) -> Type {
        match node {
            TypeNode::Nominal { path, range } => self.lower_nominal(path, *range),
            TypeNode::Optional { inner, .. } => Type::optional(self.lower_type(inner)),
            TypeNode::VariableSized { element, .. } => {
                Type::variable_sized(self.lower_type(element))
            }
            TypeNode::ConstantSized { element, size, .. } => {
                Type::constant_sized(self.lower_type(element), *size)
            }
            TypeNode::Dictionary { key, value, .. } => {
                Type::dictionary(self.lower_type(key), self.lower_type(value))
            }
            TypeNode::Function {
                type_parameters,
                parameters,
                return_annotation,
                ..
            } => self.lower_function(type_parameters, parameters, return_annotation),
            TypeNode::Restricted {
                base,
                restrictions,
                range,
            } => self.lower_restricted(base.as_deref(), restrictions, *range),
            TypeNode::Reference {
                authorized,
                referenced,
                ..
            } => Type::reference(*authorized, self.lower_type(referenced)),
        }
    }

    fn lookup_type_param(&self, name: &str) -> Option<Type> {
        self.type_param_scopes
            .borrow()
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|parameter| parameter.name == name)
            .map(|parameter| Type::Generic(Arc::clone(parameter)))
    }

    fn lower_nominal(&self, path: &[String], range: Range) -> Type {
        let Some((first, nested)) = path.split_first() else {
            return Type::Never;
        };
        if path.len() > MAX_QUALIFIED_NAME_DEPTH {
            self.report(TypeError::NotDeclared {
                name: path.join("."),
                range,
            });
            return Type::Never;
        }
        let Some(mut ty) = self
            .lookup_type_param(first)
            .or_else(|| self.scope.get(first).cloned())
        else {
            self.report(TypeError::NotDeclared {
                name: first.clone(),
                range,
            });
            return Type::Never;
        };

        for (index, segment) in nested.iter().enumerate() {
            let nested_def = match ty {
                Type::Composite(id) | Type::Interface(id) => self.db.nested_type(id, segment),
                _ => None,
            };
            let Some(nested_ty) = nested_def.and_then(|id| self.db.type_of(id)) else {
                self.report(TypeError::NotDeclared {
                    name: path[..index + 2].join("."),
                    range,
                });
                return Type::Never;
            };
            ty = nested_ty;
        }
        ty
    }

    fn lower_function(
        &self,
        type_parameters: &[TypeParameterNode],
        parameters: &[ParameterNode],
        return_annotation: &TypeAnnotationNode,
    ) -> Type {
        let mut lowered_type_parameters = Vec::with_capacity(type_parameters.len());
        self.type_param_scopes.borrow_mut().push(Vec::new());
        for node in type_parameters {
            let bound = node.bound.as_ref().map(|bound| self.lower_type(bound));
            let parameter = Arc::new(TypeParameter::new(node.name.clone(), bound));
            if let Some(scope) = self.type_param_scopes.borrow_mut().last_mut() {
                scope.push(Arc::clone(&parameter));
            }
            lowered_type_parameters.push(parameter.as_ref().clone());
        }

        let parameters = parameters
            .iter()
            .map(|parameter| Parameter {
                label: parameter.label.clone(),
                identifier: parameter.identifier.clone(),
                annotation: self.lower_annotation(&parameter.annotation),
            })
            .collect();
        let return_annotation = self.lower_annotation(return_annotation);
        self.type_param_scopes.borrow_mut().pop();

        Type::function(
            FunctionType::new(parameters, return_annotation)
                .with_type_parameters(lowered_type_parameters),
        )
    }

    fn lower_restricted(
        &self,
        base: Option<&TypeNode>,
        restrictions: &[TypeNode],
        range: Range,
    ) -> Type {
        let mut restriction_ids: Vec<DefId> = Vec::with_capacity(restrictions.len());
        for node in restrictions {
            let reported = self.diagnostic_count();
            let lowered = self.lower_type(node);
            if self.diagnostic_count() > reported {
                return Type::Never;
            }
            match lowered {
                Type::Interface(id) | Type::Composite(id) => restriction_ids.push(id),
                other => {
                    self.report(TypeError::InvalidRestrictionType {
                        ty: TypeFormatter::new(self.db).qualified_string(&other),
                        range: node.range(),
                    });
                    return Type::Never;
                }
            }
        }

        let reported = self.diagnostic_count();
        let base = match base {
            Some(node) => self.lower_type(node),
            None => self.implicit_base(&restriction_ids),
        };
        if self.diagnostic_count() > reported {
            return Type::Never;
        }

        match RestrictedType::with_options(self.db, base, restriction_ids, &self.options) {
            Ok(restricted) => Type::restricted(restricted),
            Err(error) => {
                self.report(error.with_range(range));
                Type::Never
            }
        }
    }

    /// `{I}` restricts the top type of `I`'s kind.
    fn implicit_base(&self, restrictions: &[DefId]) -> Type {
        let first_kind = restrictions
            .first()
            .and_then(|id| self.db.get(*id))
            .map(|declared| declared.composite_kind);
        match first_kind {
            Some(CompositeKind::Resource) => Type::AnyResource,
            _ => Type::AnyStruct,
        }
    }
}

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod tests;
