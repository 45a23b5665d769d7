// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

use std::collections::HashSet;

use crate::ast::{Class, Expr, Feature, OBJECT};

use super::diagnostics::{Binder, Diagnostics, SemanticError};
use super::registry::{ClassRegistry, BOOL, INT, SELF_TYPE, STRING};
use super::{operands, scope, AnalysisOptions};

/// Feature-level checks for one class, in declaration order. Methods also go
/// through the binding and operand passes.
pub fn validate_class<'p>(
    class: &'p Class,
    registry: &ClassRegistry<'p>,
    options: &AnalysisOptions,
    diags: &mut Diagnostics,
) {
    let cname = class.name();
    let mut names = HashSet::new();

    for feature in class.features() {
        let name = feature.name();
        tracing::trace!(class = cname, feature = name, kind = %feature.kind(), "checking feature");

        if name == "self" {
            diags.report(SemanticError::ReservedName {
                binder: Binder::Feature,
            });
        }
        if !names.insert(name) {
            diags.report(SemanticError::DuplicateFeature {
                feature: name.to_string(),
                class: cname.to_string(),
            });
        }

        check_declared_type(feature.declared_type(), name, cname, registry, diags);

        match feature {
            Feature::Attr { ty, init, .. } => {
                if let Some(err) = builtin_init_mismatch(ty, init, name) {
                    diags.report(err);
                }
            }
            Feature::Method { .. } => {
                check_override(class, feature, registry, diags);
                let locals = scope::validate_method(class, feature, registry, diags);
                if options.operand_checks {
                    operands::check_method(class, feature, &locals, registry, diags);
                }
            }
        }
    }

    if cname == "Main" && !names.contains("main") {
        diags.report(SemanticError::MissingMainMethod);
    }
}

/// Declared type must be a known class and must not be `SELF_TYPE`.
/// Shared by attributes, method returns and formals.
pub(crate) fn check_declared_type(
    ty: &str,
    name: &str,
    class: &str,
    registry: &ClassRegistry<'_>,
    diags: &mut Diagnostics,
) {
    if !registry.is_known(ty) {
        diags.report(SemanticError::UnknownType {
            ty: ty.to_string(),
            name: name.to_string(),
        });
    }
    if ty == SELF_TYPE {
        diags.report(SemanticError::SelfTypeAsFieldType {
            name: name.to_string(),
            class: class.to_string(),
        });
    }
}

/// A builtin-typed binding may only be initialized by a literal of its own
/// kind, parenthesized or not. A missing initializer is always fine.
pub(crate) fn builtin_init_mismatch(ty: &str, init: &Expr, name: &str) -> Option<SemanticError> {
    let expected = match (ty, init.without_parens()) {
        (_, Expr::NoExpr) => return None,
        (INT, Expr::Int(_)) | (BOOL, Expr::Bool(_)) | (STRING, Expr::Str(_)) => return None,
        (INT, _) => "integer",
        (BOOL, _) => "boolean",
        (STRING, _) => "string",
        _ => return None,
    };
    Some(SemanticError::BadBuiltinInit {
        ty: ty.to_string(),
        name: name.to_string(),
        expected,
    })
}

/// Compares a method against same-named features of its direct parent's
/// own declaration.
fn check_override(
    class: &Class,
    method: &Feature,
    registry: &ClassRegistry<'_>,
    diags: &mut Diagnostics,
) {
    let parent_name = class.parent_name();
    if parent_name == OBJECT {
        return;
    }

    let Some(parent) = registry.declaration(parent_name) else {
        diags.report(SemanticError::MissingParentClass {
            parent: parent_name.to_string(),
            class: class.name().to_string(),
        });
        return;
    };

    for inherited in parent.features().iter().filter(|f| f.name() == method.name()) {
        if inherited.kind() != method.kind() {
            diags.report(SemanticError::OverrideKindMismatch {
                feature: method.name().to_string(),
                parent: parent_name.to_string(),
                class: class.name().to_string(),
            });
        } else if !signatures_match(method, inherited) {
            diags.report(SemanticError::OverrideSignatureMismatch {
                feature: method.name().to_string(),
                parent: parent_name.to_string(),
                class: class.name().to_string(),
            });
        }
    }
}

/// Same return type, same arity, and formals equal by name and type in order.
fn signatures_match(a: &Feature, b: &Feature) -> bool {
    a.declared_type() == b.declared_type()
        && a.formals().len() == b.formals().len()
        && a.formals()
            .iter()
            .zip(b.formals())
            .all(|(fa, fb)| fa.name() == fb.name() && fa.declared_type() == fb.declared_type())
}
