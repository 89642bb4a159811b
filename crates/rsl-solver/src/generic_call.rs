//! Type-argument validation for invocations of generic functions.
//!
//! Type parameters are bound either explicitly (`save<Int>(x)`) or by
//! inference from the value arguments, left to right. Once a parameter is
//! bound, later arguments must conform to the binding.
//!
//! Errors are collected rather than short-circuited: an explicit type
//! argument that disagrees with a value argument produces a
//! `TypeParameterTypeMismatch` for the binding *and* a `TypeMismatch` for the
//! argument checked against the substituted parameter type.

use crate::def::DeclarationTable;
use crate::diagnostics::TypeError;
use crate::format::TypeFormatter;
use crate::subtype::is_subtype;
use crate::types::{FunctionType, Parameter, Type, TypeAnnotation, TypeParameter};
use indexmap::IndexMap;
use rsl_common::Range;
use tracing::{debug, trace};

/// A type or value argument at an invocation, with its source range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationArgument {
    pub ty: Type,
    pub range: Range,
}

impl InvocationArgument {
    pub const fn new(ty: Type, range: Range) -> Self {
        Self { ty, range }
    }
}

/// Outcome of checking one generic invocation.
#[derive(Clone, Debug)]
pub struct InvocationCheck {
    /// Type parameter bindings, in declaration order. Parameters that could
    /// not be bound fall back to their bound, or `AnyStruct`.
    pub type_arguments: IndexMap<String, Type>,
    /// Parameter types with the bindings substituted.
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
    pub diagnostics: Vec<TypeError>,
}

impl InvocationCheck {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Check an invocation of `function` with explicit `type_arguments` and value `arguments`.
pub fn check_generic_invocation(
    db: &DeclarationTable,
    function: &FunctionType,
    type_arguments: &[InvocationArgument],
    arguments: &[InvocationArgument],
    range: Range,
) -> InvocationCheck {
    let mut checker = InvocationChecker {
        db,
        formatter: TypeFormatter::new(db),
        type_parameters: &function.type_parameters,
        bindings: IndexMap::new(),
        diagnostics: Vec::new(),
    };

    checker.bind_explicit(type_arguments);

    if arguments.len() != function.parameters.len() {
        checker.diagnostics.push(TypeError::ArgumentCount {
            expected: function.parameters.len(),
            actual: arguments.len(),
            range,
        });
    }
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        checker.check_argument(parameter, argument);
    }

    for parameter in &function.type_parameters {
        if !checker.bindings.contains_key(&parameter.name) {
            checker.diagnostics.push(TypeError::TypeParameterTypeInference {
                name: parameter.name.clone(),
                range,
            });
        }
    }

    let type_arguments: IndexMap<String, Type> = function
        .type_parameters
        .iter()
        .map(|parameter| {
            let ty = checker
                .bindings
                .get(&parameter.name)
                .or(parameter.bound.as_ref())
                .cloned()
                .unwrap_or(Type::AnyStruct);
            (parameter.name.clone(), ty)
        })
        .collect();
    let parameter_types = function
        .parameters
        .iter()
        .map(|parameter| substitute(&parameter.annotation.ty, &type_arguments))
        .collect();
    let return_type = substitute(&function.return_annotation.ty, &type_arguments);

    debug!(
        type_parameters = function.type_parameters.len(),
        arguments = arguments.len(),
        diagnostics = checker.diagnostics.len(),
        "check_generic_invocation"
    );

    InvocationCheck {
        type_arguments,
        parameter_types,
        return_type,
        diagnostics: checker.diagnostics,
    }
}

struct InvocationChecker<'a> {
    db: &'a DeclarationTable,
    formatter: TypeFormatter<'a>,
    type_parameters: &'a [TypeParameter],
    bindings: IndexMap<String, Type>,
    diagnostics: Vec<TypeError>,
}

impl InvocationChecker<'_> {
    fn bind_explicit(&mut self, type_arguments: &[InvocationArgument]) {
        if type_arguments.len() > self.type_parameters.len() {
            let first_extra = &type_arguments[self.type_parameters.len()];
            self.diagnostics.push(TypeError::InvalidTypeArgumentCount {
                expected: self.type_parameters.len(),
                actual: type_arguments.len(),
                range: first_extra.range,
            });
        }

        for (parameter, argument) in self.type_parameters.iter().zip(type_arguments) {
            if let Some(bound) = &parameter.bound
                && !is_subtype(self.db, &argument.ty, bound)
            {
                self.diagnostics.push(TypeError::TypeMismatch {
                    expected: self.formatter.qualified_string(bound),
                    actual: self.formatter.qualified_string(&argument.ty),
                    range: argument.range,
                });
            }
            self.bindings
                .insert(parameter.name.clone(), argument.ty.clone());
        }
    }

    fn check_argument(&mut self, parameter: &Parameter, argument: &InvocationArgument) {
        self.unify(&parameter.annotation.ty, &argument.ty, argument.range);

        let expected = substitute(&parameter.annotation.ty, &self.bindings);
        if !is_subtype(self.db, &argument.ty, &expected) {
            self.diagnostics.push(TypeError::TypeMismatch {
                expected: self.formatter.qualified_string(&expected),
                actual: self.formatter.qualified_string(&argument.ty),
                range: argument.range,
            });
        }
    }

    /// Bind the type parameters `parameter` mentions to the matching parts of `argument`.
    fn unify(&mut self, parameter: &Type, argument: &Type, range: Range) {
        match (parameter, argument) {
            (Type::Generic(type_parameter), _) if self.declares(type_parameter) => {
                self.bind(type_parameter, argument, range);
            }
            (Type::Optional(parameter), Type::Optional(argument))
            | (Type::VariableSized(parameter), Type::VariableSized(argument)) => {
                self.unify(parameter, argument, range);
            }
            (Type::Optional(parameter), _) => self.unify(parameter, argument, range),
            (Type::ConstantSized(parameter), Type::ConstantSized(argument)) => {
                self.unify(&parameter.element, &argument.element, range);
            }
            (Type::Dictionary(parameter), Type::Dictionary(argument)) => {
                self.unify(&parameter.key, &argument.key, range);
                self.unify(&parameter.value, &argument.value, range);
            }
            (Type::Reference(parameter), Type::Reference(argument)) => {
                self.unify(&parameter.referenced, &argument.referenced, range);
            }
            _ => {}
        }
    }

    fn declares(&self, type_parameter: &TypeParameter) -> bool {
        self.type_parameters
            .iter()
            .any(|declared| declared.name == type_parameter.name)
    }

    fn bind(&mut self, type_parameter: &TypeParameter, argument: &Type, range: Range) {
        if let Some(bound_type) = self.bindings.get(&type_parameter.name) {
            if !is_subtype(self.db, argument, bound_type) {
                self.diagnostics.push(TypeError::TypeParameterTypeMismatch {
                    expected: self.formatter.qualified_string(bound_type),
                    actual: self.formatter.qualified_string(argument),
                    range,
                });
            }
            return;
        }

        trace!(
            type_parameter = %type_parameter.name,
            inferred = %self.formatter.string(argument),
            "InvocationChecker::bind"
        );
        if let Some(bound) = &type_parameter.bound
            && !is_subtype(self.db, argument, bound)
        {
            self.diagnostics.push(TypeError::TypeMismatch {
                expected: self.formatter.qualified_string(bound),
                actual: self.formatter.qualified_string(argument),
                range,
            });
        }
        self.bindings
            .insert(type_parameter.name.clone(), argument.clone());
    }
}

/// Replace the type parameters bound in `bindings` throughout `ty`.
pub fn substitute(ty: &Type, bindings: &IndexMap<String, Type>) -> Type {
    if bindings.is_empty() || !ty.contains_generic() {
        return ty.clone();
    }
    match ty {
        Type::Generic(parameter) => bindings
            .get(&parameter.name)
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        Type::Optional(inner) => Type::optional(substitute(inner, bindings)),
        Type::VariableSized(element) => Type::variable_sized(substitute(element, bindings)),
        Type::ConstantSized(array) => {
            Type::constant_sized(substitute(&array.element, bindings), array.size)
        }
        Type::Dictionary(dictionary) => Type::dictionary(
            substitute(&dictionary.key, bindings),
            substitute(&dictionary.value, bindings),
        ),
        Type::Reference(reference) => {
            Type::reference(reference.authorized, substitute(&reference.referenced, bindings))
        }
        Type::Function(function) => {
            let substitute_annotation = |annotation: &TypeAnnotation| TypeAnnotation {
                is_resource: annotation.is_resource,
                ty: substitute(&annotation.ty, bindings),
            };
            let parameters = function
                .parameters
                .iter()
                .map(|parameter| Parameter {
                    label: parameter.label.clone(),
                    identifier: parameter.identifier.clone(),
                    annotation: substitute_annotation(&parameter.annotation),
                })
                .collect();
            Type::function(
                FunctionType::new(
                    parameters,
                    substitute_annotation(&function.return_annotation),
                )
                .with_type_parameters(function.type_parameters.clone()),
            )
        }
        _ => ty.clone(),
    }
}

#[cfg(test)]
#[path = "../tests/generic_call_tests.rs"]
mod tests;
