// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

//! Operand-shape checks for operators in method bodies.
//!
//! This is not type inference. An operand is taken to have a type when its
//! syntactic shape says so: a literal, an operator known to yield that type,
//! a static dispatch whose declared return type matches, a dynamic dispatch
//! whose method name is declared with that type in *any* class, or an
//! identifier declared with that type as a local, formal or attribute.
//! Receivers are never resolved, so a program can pass and still be
//! ill-typed.

use crate::ast::{BinOp, Class, Expr, Feature, FeatureKind};

use super::diagnostics::{Diagnostics, SemanticError};
use super::registry::{ClassRegistry, BOOL, INT};
use super::scope::MethodScope;

/// Operand types an operator accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Expected {
    Int,
    Bool,
    IntOrBool,
}

impl Expected {
    fn types(self) -> &'static [&'static str] {
        match self {
            Expected::Int => &[INT],
            Expected::Bool => &[BOOL],
            Expected::IntOrBool => &[INT, BOOL],
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Expected::Int => "Int",
            Expected::Bool => "Bool",
            Expected::IntOrBool => "Int or Bool",
        }
    }
}

fn expected_for(op: BinOp) -> Expected {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Lt | BinOp::Le => Expected::Int,
        BinOp::Eq => Expected::IntOrBool,
    }
}

/// Type an operator expression yields, as far as these checks are concerned.
/// `~` is treated as a boolean operator throughout.
fn operator_result(expr: &Expr) -> Option<&'static str> {
    match expr {
        Expr::Bin { op, .. } if op.is_arithmetic() => Some(INT),
        Expr::Bin { .. } | Expr::Neg(_) | Expr::Not(_) => Some(BOOL),
        _ => None,
    }
}

fn is_arithmetic(expr: &Expr) -> bool {
    matches!(expr, Expr::Bin { op, .. } if op.is_arithmetic())
}

/// Walks one method body and reports every operand that fails all
/// acceptance rules.
pub fn check_method<'p>(
    class: &'p Class,
    method: &'p Feature,
    locals: &MethodScope<'p>,
    registry: &ClassRegistry<'p>,
    diags: &mut Diagnostics,
) {
    let checker = OperandChecker {
        class,
        method,
        locals,
        registry,
    };
    let before = diags.error_count();
    checker.walk(method.expression(), diags);
    tracing::trace!(
        class = class.name(),
        method = method.name(),
        mismatches = diags.error_count() - before,
        "operands checked"
    );
}

struct OperandChecker<'a, 'p> {
    class: &'p Class,
    method: &'p Feature,
    locals: &'a MethodScope<'p>,
    registry: &'a ClassRegistry<'p>,
}

impl OperandChecker<'_, '_> {
    fn walk(&self, expr: &Expr, diags: &mut Diagnostics) {
        match expr {
            Expr::Bin { op, lhs, rhs } => {
                let expected = expected_for(*op);
                for operand in [lhs, rhs] {
                    self.check_operand(op.symbol(), expected, operand, op.is_arithmetic(), diags);
                }
            }
            Expr::Neg(inner) => self.check_operand("~", Expected::Bool, inner, false, diags),
            Expr::Not(inner) => self.check_operand("not", Expected::Bool, inner, false, diags),
            _ => {
                for child in expr.nested_expressions() {
                    self.walk(child, diags);
                }
            }
        }
    }

    fn check_operand(
        &self,
        op: &'static str,
        expected: Expected,
        operand: &Expr,
        in_arithmetic: bool,
        diags: &mut Diagnostics,
    ) {
        let operand = operand.without_parens();

        // arithmetic nests freely; inner operands are not re-checked
        if in_arithmetic && is_arithmetic(operand) {
            self.walk_nested_arithmetic(operand, diags);
            return;
        }

        if !expected.types().iter().any(|ty| self.has_type(operand, ty)) {
            diags.report(SemanticError::OperandTypeMismatch {
                op,
                expected: expected.describe(),
                found: operand.kind(),
                class: self.class.name().to_string(),
                method: self.method.name().to_string(),
            });
        }

        self.walk(operand, diags);
    }

    /// Descends through arithmetic nested in arithmetic without checking its
    /// operands, then walks whatever lies below as usual.
    fn walk_nested_arithmetic(&self, expr: &Expr, diags: &mut Diagnostics) {
        for child in expr.nested_expressions() {
            let child = child.without_parens();
            if is_arithmetic(child) {
                self.walk_nested_arithmetic(child, diags);
            } else {
                self.walk(child, diags);
            }
        }
    }

    fn has_type(&self, expr: &Expr, ty: &str) -> bool {
        match expr {
            Expr::Int(_) => ty == INT,
            Expr::Bool(_) => ty == BOOL,
            Expr::Bin { .. } | Expr::Neg(_) | Expr::Not(_) => operator_result(expr) == Some(ty),
            Expr::Paren(inner) => self.has_type(inner, ty),
            Expr::StaticDispatch {
                type_name, method, ..
            } => {
                self.registry
                    .declaration(type_name)
                    .and_then(|c| self.registry.inherited_feature_type(c.name(), method))
                    .is_some_and(|(kind, declared)| kind == FeatureKind::Method && declared == ty)
            }
            Expr::Dispatch { method, .. } => self
                .registry
                .feature_types()
                .approximate_feature_type_is(method, ty),
            Expr::Id(name) => self.identifier_type(name) == Some(ty),
            _ => false,
        }
    }

    /// Locals and formals first, then attributes of the class and its ancestors.
    fn identifier_type(&self, name: &str) -> Option<&str> {
        if let Some(ty) = self.locals.local_type(name) {
            return Some(ty);
        }
        match self.registry.inherited_feature_type(self.class.name(), name) {
            Some((FeatureKind::Attribute, ty)) => Some(ty),
            _ => None,
        }
    }
}
