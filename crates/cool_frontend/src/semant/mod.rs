// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

//! Semantic validation of a parsed COOL program.
//!
//! Passes run in a fixed order and all report into one [`Diagnostics`]:
//!
//! 1. class registry: builtins plus declared names, duplicates
//! 2. `Main` must exist
//! 3. hierarchy: builtin parents, missing parents, one cycle check
//! 4. per class: features, then per method its bindings and operand shapes
//!
//! No pass stops on an error, so a single run surfaces as much as it can.
//! The tree is only borrowed; nothing is annotated or mutated.

pub mod diagnostics;
pub mod features;
pub mod hierarchy;
pub mod operands;
pub mod registry;
pub mod scope;

pub use diagnostics::{Binder, Diagnostics, SemanticError};
pub use registry::{ClassRegistry, FeatureTypeIndex};
pub use scope::MethodScope;

use crate::ast::Program;

/// Knobs for a single analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Run the operand-shape heuristics over method bodies.
    pub operand_checks: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            operand_checks: true,
        }
    }
}

/// Analyse `program` with default options.
pub fn analyze_program(program: &Program) -> Diagnostics {
    analyze_program_with(program, &AnalysisOptions::default())
}

pub fn analyze_program_with(program: &Program, options: &AnalysisOptions) -> Diagnostics {
    let mut diags = Diagnostics::new();

    let registry = ClassRegistry::build(program, &mut diags);

    if !registry.is_declared("Main") {
        diags.report(SemanticError::MissingMainClass);
    }

    hierarchy::validate(&registry, &mut diags);
    tracing::debug!(errors = diags.error_count(), "hierarchy validated");

    for class in &program.classes {
        features::validate_class(class, &registry, options, &mut diags);
    }

    tracing::debug!(
        classes = program.classes.len(),
        errors = diags.error_count(),
        "semantic analysis finished"
    );
    diags
}
