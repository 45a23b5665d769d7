// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod semant;

pub use ast::*;
pub use lexer::{lex, strip_comments, LexError, Tok};
pub use parser::parse_program;
pub use semant::{
    analyze_program, analyze_program_with, AnalysisOptions, Diagnostics, SemanticError,
};

// Re-export the lifetime error alias
pub use parser::ParseError;
