// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

//! Formal parameters and `let` bindings of a single method.
//!
//! The scope is one flat set per method: a `let` conflicts with every formal
//! and with every other `let` anywhere in the same body, even in disjoint
//! blocks. There is no block-level shadowing.

use std::collections::HashMap;

use crate::ast::{Class, Expr, Feature};

use super::diagnostics::{Binder, Diagnostics, SemanticError};
use super::features::{builtin_init_mismatch, check_declared_type};
use super::registry::ClassRegistry;

/// Names bound inside one method, with their declared types. The first
/// binding of a name wins.
#[derive(Debug, Default)]
pub struct MethodScope<'p> {
    locals: HashMap<&'p str, &'p str>,
}

impl<'p> MethodScope<'p> {
    pub fn local_type(&self, name: &str) -> Option<&'p str> {
        self.locals.get(name).copied()
    }

    /// `false` when `name` was already bound.
    fn bind(&mut self, name: &'p str, ty: &'p str) -> bool {
        if self.locals.contains_key(name) {
            return false;
        }
        self.locals.insert(name, ty);
        true
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}

/// Validates formals, then every `let` in the body, and returns the
/// resulting flat scope.
pub fn validate_method<'p>(
    class: &'p Class,
    method: &'p Feature,
    registry: &ClassRegistry<'p>,
    diags: &mut Diagnostics,
) -> MethodScope<'p> {
    let mut scope = MethodScope::default();

    for formal in method.formals() {
        if formal.name() == "self" {
            diags.report(SemanticError::ReservedName {
                binder: Binder::Formal,
            });
        }
        if !scope.bind(formal.name(), formal.declared_type()) {
            diags.report(SemanticError::DuplicateFormal {
                formal: formal.name().to_string(),
                method: method.name().to_string(),
            });
        }
        check_declared_type(formal.declared_type(), formal.name(), class.name(), registry, diags);
    }

    let mut walker = LetWalker {
        class,
        method,
        registry,
        scope: &mut scope,
        diags,
    };
    walker.walk(method.expression());

    tracing::trace!(
        class = class.name(),
        method = method.name(),
        bindings = scope.len(),
        "method scope validated"
    );
    scope
}

struct LetWalker<'a, 'p> {
    class: &'p Class,
    method: &'p Feature,
    registry: &'a ClassRegistry<'p>,
    scope: &'a mut MethodScope<'p>,
    diags: &'a mut Diagnostics,
}

impl<'p> LetWalker<'_, 'p> {
    fn walk(&mut self, expr: &'p Expr) {
        if let Expr::Let(binding) = expr {
            let name = binding.name.as_str();
            if name == "self" {
                self.diags.report(SemanticError::ReservedName {
                    binder: Binder::Local,
                });
            }
            if !self.scope.bind(name, &binding.ty) {
                self.diags.report(SemanticError::DuplicateBinding {
                    name: name.to_string(),
                    method: self.method.name().to_string(),
                    class: self.class.name().to_string(),
                });
            }
            if !self.registry.is_known(&binding.ty) {
                self.diags.report(SemanticError::UnknownType {
                    ty: binding.ty.clone(),
                    name: name.to_string(),
                });
            }
            if let Some(err) = builtin_init_mismatch(&binding.ty, &binding.init, name) {
                self.diags.report(err);
            }
        }

        for child in expr.nested_expressions() {
            self.walk(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::lexer::lex;
    use crate::parser::parse_program;

    fn program(src: &str) -> Program {
        let toks = lex(src).unwrap();
        parse_program(&toks).unwrap()
    }

    /// Runs the binding pass over the first method of the first class.
    fn scope_errors(src: &str) -> (Vec<SemanticError>, usize) {
        let prog = program(src);
        let mut diags = Diagnostics::new();
        let registry = ClassRegistry::build(&prog, &mut diags);
        let class = &prog.classes[0];
        let method = class
            .features()
            .iter()
            .find(|f| matches!(f, Feature::Method { .. }))
            .unwrap();
        let scope = validate_method(class, method, &registry, &mut diags);
        (diags.into_errors(), scope.len())
    }

    #[test]
    fn formals_and_lets_share_one_scope() {
        let (errs, bound) = scope_errors(
            "class A { f(a : Int, b : Bool) : Int { let c : Int <- 1 in a }; };",
        );
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(bound, 3);
    }

    #[test]
    fn duplicate_formal_then_duplicate_binding() {
        let (errs, _) = scope_errors(
            "class A { f(a : Int, a : Int) : Int { { let a : Int in a; } }; };",
        );
        assert_eq!(
            errs,
            vec![
                SemanticError::DuplicateFormal {
                    formal: "a".to_string(),
                    method: "f".to_string(),
                },
                SemanticError::DuplicateBinding {
                    name: "a".to_string(),
                    method: "f".to_string(),
                    class: "A".to_string(),
                },
            ]
        );
    }

    #[test]
    fn lets_in_disjoint_blocks_still_conflict() {
        let (errs, _) = scope_errors(
            "class A { f() : Int { { { let x : Int in x; }; { let x : Int in x; }; } }; };",
        );
        assert_eq!(
            errs,
            vec![SemanticError::DuplicateBinding {
                name: "x".to_string(),
                method: "f".to_string(),
                class: "A".to_string(),
            }]
        );
    }

    #[test]
    fn deeply_nested_lets_are_found() {
        let (errs, bound) = scope_errors(
            "class A { f() : Int { if true then while false loop let y : Nope in 1 pool else 2 fi }; };",
        );
        assert_eq!(
            errs,
            vec![SemanticError::UnknownType {
                ty: "Nope".to_string(),
                name: "y".to_string(),
            }]
        );
        assert_eq!(bound, 1);
    }

    #[test]
    fn reserved_names_and_bad_types_on_formals_and_lets() {
        let (errs, _) = scope_errors(
            r#"class A { f(self : Int, p : SELF_TYPE, q : Nope) : Int { let self : Int <- "s" in 1 }; };"#,
        );
        assert_eq!(
            errs,
            vec![
                SemanticError::ReservedName {
                    binder: Binder::Formal
                },
                SemanticError::SelfTypeAsFieldType {
                    name: "p".to_string(),
                    class: "A".to_string(),
                },
                SemanticError::UnknownType {
                    ty: "Nope".to_string(),
                    name: "q".to_string(),
                },
                SemanticError::ReservedName {
                    binder: Binder::Local
                },
                SemanticError::DuplicateBinding {
                    name: "self".to_string(),
                    method: "f".to_string(),
                    class: "A".to_string(),
                },
                SemanticError::BadBuiltinInit {
                    ty: "Int".to_string(),
                    name: "self".to_string(),
                    expected: "integer",
                },
            ]
        );
    }

    #[test]
    fn parenthesized_let_initializer_matches_its_type() {
        let (errs, bound) = scope_errors(
            r#"class A { f() : Int { let a : Int <- (1), b : String <- (("s")), c : Bool <- (2) in a }; };"#,
        );
        assert_eq!(
            errs,
            vec![SemanticError::BadBuiltinInit {
                ty: "Bool".to_string(),
                name: "c".to_string(),
                expected: "boolean",
            }]
        );
        assert_eq!(bound, 3);
    }

    #[test]
    fn let_initializers_are_walked_too() {
        let (errs, bound) = scope_errors(
            "class A { f() : Int { let x : Int <- (let y : Int in y) in x }; };",
        );
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(bound, 2);
    }
}
