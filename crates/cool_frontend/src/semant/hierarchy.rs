// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;

use crate::ast::OBJECT;

use super::diagnostics::{Diagnostics, SemanticError};
use super::registry::{ClassRegistry, NON_INHERITABLE};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Color {
    /// On the walk currently in progress.
    Gray,
    /// Fully resolved; no cycle reachable from here.
    Black,
}

/// Checks the declared parent map: builtin parents, missing parents, and at
/// most one inheritance cycle report per run.
pub fn validate(registry: &ClassRegistry<'_>, diags: &mut Diagnostics) {
    for (class, parent) in registry.declared_parents() {
        if NON_INHERITABLE.contains(&parent) {
            diags.report(SemanticError::IllegalInheritance {
                class: class.to_string(),
                parent: parent.to_string(),
            });
        } else if parent != OBJECT && !registry.is_declared(parent) {
            diags.report(SemanticError::UnknownParent {
                class: class.to_string(),
                parent: parent.to_string(),
            });
        }
    }

    if let Some(class) = find_cycle(registry) {
        diags.report(SemanticError::InheritanceCycle {
            class: class.to_string(),
            hierarchy: registry.hierarchy(),
        });
    }
}

/// Three-color depth-first search over parent links. Every class has at
/// most one parent, so each walk is a path; meeting a gray node closes a
/// cycle and the node met is returned.
fn find_cycle<'p>(registry: &ClassRegistry<'p>) -> Option<&'p str> {
    // absent = white
    let mut color: HashMap<&'p str, Color> = HashMap::new();

    for (start, _) in registry.declared_parents() {
        if start == OBJECT || color.contains_key(start) {
            continue;
        }

        let mut path = Vec::new();
        let mut cur = start;
        let found = loop {
            match color.get(cur) {
                Some(Color::Gray) => break Some(cur),
                Some(Color::Black) => break None,
                None => {}
            }
            color.insert(cur, Color::Gray);
            path.push(cur);

            match registry.parent_of(cur) {
                Some(parent) if parent != OBJECT => cur = parent,
                // Object, or a parent that was never declared
                _ => break None,
            }
        };

        if found.is_some() {
            tracing::debug!(start, "inheritance cycle found");
            return found;
        }
        for name in path {
            color.insert(name, Color::Black);
        }
    }

    None
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

    fn hierarchy_errors(src: &str) -> Diagnostics {
        let prog = program(src);
        let mut diags = Diagnostics::new();
        let registry = ClassRegistry::build(&prog, &mut diags);
        validate(&registry, &mut diags);
        diags
    }

    fn cycles(diags: &Diagnostics) -> usize {
        diags.count(|e| matches!(e, SemanticError::InheritanceCycle { .. }))
    }

    #[test]
    fn acyclic_chain_is_clean() {
        let diags = hierarchy_errors("class A { }; class B inherits A { }; class C inherits B { };");
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn self_inheritance_is_a_cycle() {
        let diags = hierarchy_errors("class A inherits A { };");
        assert_eq!(diags.error_count(), 1);
        assert_eq!(cycles(&diags), 1);
    }

    #[test]
    fn two_cycle_reported_once() {
        let diags = hierarchy_errors("class A inherits B { }; class B inherits A { };");
        assert_eq!(cycles(&diags), 1);
    }

    #[test]
    fn tail_leading_into_cycle_is_reported_once() {
        let diags = hierarchy_errors(
            "class T inherits A { }; class A inherits B { }; class B inherits C { }; class C inherits A { };",
        );
        assert_eq!(diags.error_count(), 1);
        match &diags.errors()[0] {
            SemanticError::InheritanceCycle { class, hierarchy } => {
                assert_eq!(class, "A");
                assert_eq!(hierarchy.len(), 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn builtin_parents_are_illegal_not_unknown() {
        let diags = hierarchy_errors(
            "class A inherits Int { }; class B inherits Bool { }; class C inherits String { }; class D inherits SELF_TYPE { };",
        );
        assert_eq!(diags.error_count(), 4);
        assert_eq!(
            diags.count(|e| matches!(e, SemanticError::IllegalInheritance { .. })),
            4
        );
    }

    #[test]
    fn missing_parent_does_not_hide_cycles() {
        let diags = hierarchy_errors(
            "class A inherits Nope { }; class B inherits C { }; class C inherits B { };",
        );
        assert_eq!(
            diags.errors()[0],
            SemanticError::UnknownParent {
                class: "A".to_string(),
                parent: "Nope".to_string(),
            }
        );
        assert_eq!(cycles(&diags), 1);
    }

    #[test]
    fn redeclared_object_is_not_a_cycle() {
        let diags = hierarchy_errors("class Object { };");
        assert_eq!(cycles(&diags), 0);
    }
}
