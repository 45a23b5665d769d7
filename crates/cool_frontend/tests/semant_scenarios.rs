use cool_frontend::{analyze_program, lex, parse_program, Diagnostics, SemanticError};

fn analyze(src: &str) -> Diagnostics {
    let toks = lex(src).unwrap();
    let prog = parse_program(&toks).unwrap();
    analyze_program(&prog)
}

const MAIN: &str = "class Main { main() : Int { 0 }; };";

fn with_main(src: &str) -> String {
    format!("{src}\n{MAIN}")
}

#[test]
fn no_classes_only_misses_main() {
    let diags = analyze("-- nothing here\n");
    assert_eq!(diags.errors(), &[SemanticError::MissingMainClass]);
}

#[test]
fn main_without_main_method() {
    let diags = analyze("class Main { x : Int; };");
    assert_eq!(diags.errors(), &[SemanticError::MissingMainMethod]);
}

#[test]
fn self_inheritance_is_one_cycle() {
    let diags = analyze(&with_main("class A inherits A { };"));
    assert_eq!(diags.error_count(), 1);
    assert!(matches!(
        &diags.errors()[0],
        SemanticError::InheritanceCycle { class, .. } if class == "A"
    ));
}

#[test]
fn builtin_attribute_initializers() {
    let bad = analyze(&with_main(r#"class A { x : Int <- "hello"; };"#));
    assert_eq!(
        bad.errors(),
        &[SemanticError::BadBuiltinInit {
            ty: "Int".to_string(),
            name: "x".to_string(),
            expected: "integer",
        }]
    );

    let good = analyze(&with_main("class A { x : Int <- 5; };"));
    assert!(good.is_empty(), "{good:?}");
}

#[test]
fn duplicate_formal_and_shadowing_let() {
    let diags = analyze(&with_main(
        "class A { f(a : Int, a : Int) : Int { { let a : Int <- 1 in a; } }; };",
    ));
    assert_eq!(
        diags.count(|e| matches!(e, SemanticError::DuplicateFormal { .. })),
        1
    );
    assert_eq!(
        diags.count(|e| matches!(e, SemanticError::DuplicateBinding { .. })),
        1
    );
    assert_eq!(diags.error_count(), 2);
}

#[test]
fn illegal_parent_does_not_stop_the_class() {
    let diags = analyze(&with_main("class B inherits Int { self : Int; y : Nope; };"));
    assert_eq!(
        diags.errors(),
        &[
            SemanticError::IllegalInheritance {
                class: "B".to_string(),
                parent: "Int".to_string(),
            },
            SemanticError::ReservedName {
                binder: cool_frontend::semant::Binder::Feature,
            },
            SemanticError::UnknownType {
                ty: "Nope".to_string(),
                name: "y".to_string(),
            },
        ]
    );
}

#[test]
fn overrides_compare_full_signatures() {
    let same = analyze(&with_main(
        "class A { f(x : Int) : Bool { true }; }; class B inherits A { f(x : Int) : Bool { false }; };",
    ));
    assert!(same.is_empty(), "{same:?}");

    let differ = analyze(&with_main(
        "class A { f(x : Int) : Bool { true }; }; class B inherits A { f(x : Int, y : Int) : Bool { false }; };",
    ));
    assert_eq!(
        differ.count(|e| matches!(e, SemanticError::OverrideSignatureMismatch { .. })),
        1
    );
}

#[test]
fn analysis_is_repeatable() {
    let toks = lex(
        r#"
        class A inherits B { x : Int <- "s"; };
        class B inherits A { f(a : Int, a : Bool) : Nope { 1 + "q" }; };
        class C inherits String { };
        "#,
    )
    .unwrap();
    let prog = parse_program(&toks).unwrap();

    let first = analyze_program(&prog);
    let second = analyze_program(&prog);
    assert!(first.error_count() > 0);
    assert_eq!(first, second);
}

#[test]
fn every_error_surfaces_in_one_run() {
    let diags = analyze(
        r#"
        class Main inherits Bool {
          self : SELF_TYPE;
          go(self : Nope) : Int { ~1 };
        };
        class Main { };
        class Orphan inherits Ghost { };
        "#,
    );

    let rendered: Vec<String> = diags.errors().iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "class 'Main' already exists!",
            "class 'Main': can't use parent class 'Bool' (builtin)",
            "parent of class 'Orphan' ('Ghost') doesn't exist",
            "can't use 'self' as feature name",
            "can't use SELF_TYPE as the type of 'self' inside class 'Main'",
            "parent class 'Bool' of class 'Main' doesn't exist",
            "can't use 'self' as formal name",
            "unknown type 'Nope' in self",
            "operand of '~' in 'Main.go' must be Bool, found integer constant",
            "No method 'main' in class 'Main'",
            "No method 'main' in class 'Main'",
        ]
    );
}
