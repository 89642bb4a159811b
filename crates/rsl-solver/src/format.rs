//! Rendering types to concrete syntax and to stable `TypeId`s.
//!
//! Three renderings exist for every type:
//!
//! - `string`: source syntax with bare identifiers, e.g. `[((Int8): Int16); 2]`
//! - `qualified_string`: the same, with qualified identifiers for nominal types
//! - `type_id`: the compact identity string, e.g. `[((Int8):Int16);2]`, with
//!   location-prefixed nominal types and sorted restrictions

use crate::def::{DeclarationTable, DefId};
use crate::types::{FunctionType, Type, TypeAnnotation, TypeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Style {
    Plain,
    Qualified,
}

/// Renders types against the declarations they refer to.
pub struct TypeFormatter<'a> {
    db: &'a DeclarationTable,
}

impl<'a> TypeFormatter<'a> {
    pub const fn new(db: &'a DeclarationTable) -> Self {
        Self { db }
    }

    pub fn string(&self, ty: &Type) -> String {
        self.render(ty, Style::Plain)
    }

    pub fn qualified_string(&self, ty: &Type) -> String {
        self.render(ty, Style::Qualified)
    }

    /// `@T` for annotations carrying the resource marker.
    pub fn annotation(&self, annotation: &TypeAnnotation) -> String {
        self.render_annotation(annotation, Style::Plain)
    }

    fn nominal_name(&self, id: DefId, style: Style) -> String {
        match style {
            Style::Plain => self.db.identifier(id).to_string(),
            Style::Qualified => self.db.qualified_identifier(id).to_string(),
        }
    }

    fn render_annotation(&self, annotation: &TypeAnnotation, style: Style) -> String {
        let ty = self.render(&annotation.ty, style);
        if annotation.is_resource {
            format!("@{ty}")
        } else {
            ty
        }
    }

    fn render(&self, ty: &Type, style: Style) -> String {
        match ty {
            Type::Optional(inner) => format!("{}?", self.render(inner, style)),
            Type::VariableSized(element) => format!("[{}]", self.render(element, style)),
            Type::ConstantSized(array) => {
                format!("[{}; {}]", self.render(&array.element, style), array.size)
            }
            Type::Dictionary(dictionary) => format!(
                "{{{}: {}}}",
                self.render(&dictionary.key, style),
                self.render(&dictionary.value, style)
            ),
            Type::Function(function) => self.render_function(function, style),
            Type::Composite(id) | Type::Interface(id) => self.nominal_name(*id, style),
            Type::Restricted(restricted) => {
                let restrictions: Vec<String> = restricted
                    .restrictions()
                    .iter()
                    .map(|id| self.nominal_name(*id, style))
                    .collect();
                format!(
                    "{}{{{}}}",
                    self.render(restricted.base(), style),
                    restrictions.join(", ")
                )
            }
            Type::Reference(reference) => {
                let auth = if reference.authorized { "auth " } else { "" };
                format!("{auth}&{}", self.render(&reference.referenced, style))
            }
            Type::Generic(parameter) => parameter.name.clone(),
            Type::Numeric(numeric) => numeric.name().to_string(),
            Type::String
            | Type::Character
            | Type::Address
            | Type::Bool
            | Type::Void
            | Type::Never
            | Type::AnyStruct
            | Type::AnyResource => simple_name(ty).to_string(),
        }
    }

    fn render_function(&self, function: &FunctionType, style: Style) -> String {
        let mut out = String::from("(");
        if function.is_generic() {
            let type_parameters: Vec<String> = function
                .type_parameters
                .iter()
                .map(|parameter| match &parameter.bound {
                    Some(bound) => format!("{}: {}", parameter.name, self.render(bound, style)),
                    None => parameter.name.clone(),
                })
                .collect();
            out.push_str(&format!("<{}>", type_parameters.join(", ")));
        }
        let parameters: Vec<String> = function
            .parameters
            .iter()
            .map(|parameter| {
                let annotation = self.render_annotation(&parameter.annotation, style);
                match (&parameter.label, &parameter.identifier) {
                    (Some(label), Some(identifier)) => {
                        format!("{label} {identifier}: {annotation}")
                    }
                    (None, Some(identifier)) => format!("{identifier}: {annotation}"),
                    (Some(label), None) => format!("{label}: {annotation}"),
                    (None, None) => annotation,
                }
            })
            .collect();
        out.push_str(&format!(
            "({}): {})",
            parameters.join(", "),
            self.render_annotation(&function.return_annotation, style)
        ));
        out
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn type_id(&self, ty: &Type) -> TypeId {
        TypeId::new(self.id_string(ty))
    }

    fn annotation_id(&self, annotation: &TypeAnnotation) -> String {
        let id = self.id_string(&annotation.ty);
        if annotation.is_resource {
            format!("@{id}")
        } else {
            id
        }
    }

    fn id_string(&self, ty: &Type) -> String {
        match ty {
            Type::Optional(inner) => format!("{}?", self.id_string(inner)),
            Type::VariableSized(element) => format!("[{}]", self.id_string(element)),
            Type::ConstantSized(array) => {
                format!("[{};{}]", self.id_string(&array.element), array.size)
            }
            Type::Dictionary(dictionary) => format!(
                "{{{}:{}}}",
                self.id_string(&dictionary.key),
                self.id_string(&dictionary.value)
            ),
            Type::Function(function) => {
                let mut out = String::from("(");
                if function.is_generic() {
                    let type_parameters: Vec<String> = function
                        .type_parameters
                        .iter()
                        .map(|parameter| match &parameter.bound {
                            Some(bound) => format!("{}:{}", parameter.name, self.id_string(bound)),
                            None => parameter.name.clone(),
                        })
                        .collect();
                    out.push_str(&format!("<{}>", type_parameters.join(",")));
                }
                let parameters: Vec<String> = function
                    .parameters
                    .iter()
                    .map(|parameter| self.annotation_id(&parameter.annotation))
                    .collect();
                out.push_str(&format!(
                    "({}):{})",
                    parameters.join(","),
                    self.annotation_id(&function.return_annotation)
                ));
                out
            }
            Type::Composite(id) | Type::Interface(id) => self.db.type_id_of(*id).to_string(),
            Type::Restricted(restricted) => {
                let mut restrictions: Vec<String> = restricted
                    .restrictions()
                    .iter()
                    .map(|id| self.db.type_id_of(*id).to_string())
                    .collect();
                restrictions.sort();
                format!(
                    "{}{{{}}}",
                    self.id_string(restricted.base()),
                    restrictions.join(",")
                )
            }
            Type::Reference(reference) => {
                let auth = if reference.authorized { "auth" } else { "" };
                format!("{auth}&{}", self.id_string(&reference.referenced))
            }
            Type::Generic(parameter) => parameter.name.clone(),
            Type::Numeric(numeric) => numeric.name().to_string(),
            Type::String
            | Type::Character
            | Type::Address
            | Type::Bool
            | Type::Void
            | Type::Never
            | Type::AnyStruct
            | Type::AnyResource => simple_name(ty).to_string(),
        }
    }
}

/// Name of a type that is spelled by a single keyword.
pub(crate) const fn simple_name(ty: &Type) -> &'static str {
    match ty {
        Type::String => "String",
        Type::Character => "Character",
        Type::Address => "Address",
        Type::Bool => "Bool",
        Type::Void => "Void",
        Type::Never => "Never",
        Type::AnyStruct => "AnyStruct",
        Type::AnyResource => "AnyResource",
        Type::Numeric(numeric) => numeric.name(),
        _ => "",
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
