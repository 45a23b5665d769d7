// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

//! Semantic error taxonomy and the sink every pass reports into.

use std::fmt;

use thiserror::Error;

use crate::ast::ExprKind;

/// What kind of name a reserved-name violation was found on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Binder {
    Feature,
    Formal,
    Local,
}

impl fmt::Display for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binder::Feature => f.write_str("feature"),
            Binder::Formal => f.write_str("formal"),
            Binder::Local => f.write_str("new local variable"),
        }
    }
}

/// A semantic violation. None of these stop analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("class '{class}' already exists!")]
    DuplicateClass { class: String },

    #[error("can't redeclare SELF_TYPE as a class")]
    SelfTypeRedeclared,

    #[error("class '{class}': can't use parent class '{parent}' (builtin)")]
    IllegalInheritance { class: String, parent: String },

    #[error("parent of class '{class}' ('{parent}') doesn't exist")]
    UnknownParent { class: String, parent: String },

    /// `hierarchy` is the child/parent map at the time of detection, in
    /// declaration order, for the driver's dump.
    #[error("loop detected in classes inheritance hierarchy (through class '{class}')")]
    InheritanceCycle {
        class: String,
        hierarchy: Vec<(String, String)>,
    },

    #[error("can't use 'self' as {binder} name")]
    ReservedName { binder: Binder },

    #[error("feature '{feature}' in '{class}' already exists!")]
    DuplicateFeature { feature: String, class: String },

    #[error("unknown type '{ty}' in {name}")]
    UnknownType { ty: String, name: String },

    #[error("can't use SELF_TYPE as the type of '{name}' inside class '{class}'")]
    SelfTypeAsFieldType { name: String, class: String },

    #[error("initialization of {ty} '{name}' with non-{expected} value")]
    BadBuiltinInit {
        ty: String,
        name: String,
        expected: &'static str,
    },

    #[error("wrong override of feature '{feature}' from class '{parent}' in class '{class}'")]
    OverrideKindMismatch {
        feature: String,
        parent: String,
        class: String,
    },

    #[error(
        "'{feature}' method from class '{parent}' doesn't match override version of it in class '{class}'"
    )]
    OverrideSignatureMismatch {
        feature: String,
        parent: String,
        class: String,
    },

    #[error("parent class '{parent}' of class '{class}' doesn't exist")]
    MissingParentClass { parent: String, class: String },

    #[error("No method 'main' in class 'Main'")]
    MissingMainMethod,

    #[error("class Main doesn't exist")]
    MissingMainClass,

    #[error("formal '{formal}' in '{method}' already exists!")]
    DuplicateFormal { formal: String, method: String },

    #[error("local '{name}' in '{method}' from '{class}' already exists!")]
    DuplicateBinding {
        name: String,
        method: String,
        class: String,
    },

    #[error("operand of '{op}' in '{class}.{method}' must be {expected}, found {found}")]
    OperandTypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: ExprKind,
        class: String,
        method: String,
    },
}

/// Ordered log of semantic errors for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<SemanticError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: SemanticError) {
        tracing::debug!(%error, "semantic error");
        self.errors.push(error);
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    /// Number of recorded errors matching `pred`.
    pub fn count(&self, pred: impl Fn(&SemanticError) -> bool) -> usize {
        self.errors.iter().filter(|e| pred(e)).count()
    }

    pub fn into_errors(self) -> Vec<SemanticError> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a SemanticError;
    type IntoIter = std::slice::Iter<'a, SemanticError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
