// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

//! Parsed COOL program and the read-only accessors semantic analysis uses.

use std::fmt;

/// Name every class without an `inherits` clause reports as its parent.
pub const OBJECT: &str = "Object";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,           // TYPE
    pub parent: Option<String>, // TYPE
    pub features: Vec<Feature>,
}

impl Class {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parent, or `Object` when the class has no `inherits` clause.
    pub fn parent_name(&self) -> &str {
        self.parent.as_deref().unwrap_or(OBJECT)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Method,
    Attribute,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Method => f.write_str("method"),
            FeatureKind::Attribute => f.write_str("attribute"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature {
    Method {
        name: String, // ID
        formals: Vec<Formal>,
        ret_type: String, // TYPE
        body: Expr,
    },
    Attr {
        name: String, // ID
        ty: String,   // TYPE
        init: Expr,   // NoExpr when absent
    },
}

impl Feature {
    pub fn name(&self) -> &str {
        match self {
            Feature::Method { name, .. } | Feature::Attr { name, .. } => name,
        }
    }

    /// Return type for methods, declared type for attributes.
    pub fn declared_type(&self) -> &str {
        match self {
            Feature::Method { ret_type, .. } => ret_type,
            Feature::Attr { ty, .. } => ty,
        }
    }

    /// Formal parameters; attributes have none.
    pub fn formals(&self) -> &[Formal] {
        match self {
            Feature::Method { formals, .. } => formals,
            Feature::Attr { .. } => &[],
        }
    }

    /// Method body or attribute initializer.
    pub fn expression(&self) -> &Expr {
        match self {
            Feature::Method { body, .. } => body,
            Feature::Attr { init, .. } => init,
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Method { .. } => FeatureKind::Method,
            Feature::Attr { .. } => FeatureKind::Attribute,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formal {
    pub name: String, // ID
    pub ty: String,   // TYPE
}

impl Formal {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &str {
        &self.ty
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Assign {
        name: String,
        expr: Box<Expr>,
    },

    // recv.method(args)
    Dispatch {
        recv: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },

    // recv@Type.method(args)
    StaticDispatch {
        recv: Box<Expr>,
        type_name: String,
        method: String,
        args: Vec<Expr>,
    },

    If {
        cond: Box<Expr>,
        then_: Box<Expr>,
        else_: Box<Expr>,
    },

    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },

    Block(Vec<Expr>),

    // one binding per node; `let a, b in e` nests
    Let(LetBinding),

    Case {
        expr: Box<Expr>,
        arms: Vec<CaseArm>,
    },

    New(String),

    IsVoid(Box<Expr>),

    // unary boolean negation
    Not(Box<Expr>),

    // unary negation, ~expr
    Neg(Box<Expr>),

    // infix binary operations
    Bin {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    // parenthesis expression
    Paren(Box<Expr>),

    // literals
    Id(String),
    Int(i64),
    Str(String),
    Bool(bool),
    Self_,

    // absent initializer
    NoExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetBinding {
    pub name: String,
    pub ty: String,
    pub init: Box<Expr>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseArm {
    pub name: String,
    pub ty: String,
    pub expr: Expr,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Eq,
}

impl BinOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Le)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Eq => "=",
        }
    }
}

/// Syntactic kind of an expression node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Assign,
    Dispatch,
    StaticDispatch,
    Cond,
    Loop,
    Block,
    Let,
    Case,
    New,
    IsVoid,
    Not,
    Neg,
    Arithmetic(BinOp),
    Compare(BinOp),
    Equal,
    Paren,
    ObjectRef,
    IntConst,
    StringConst,
    BoolConst,
    SelfRef,
    NoExpr,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Assign => f.write_str("assignment"),
            ExprKind::Dispatch => f.write_str("dispatch"),
            ExprKind::StaticDispatch => f.write_str("static dispatch"),
            ExprKind::Cond => f.write_str("conditional"),
            ExprKind::Loop => f.write_str("loop"),
            ExprKind::Block => f.write_str("block"),
            ExprKind::Let => f.write_str("let"),
            ExprKind::Case => f.write_str("case"),
            ExprKind::New => f.write_str("new"),
            ExprKind::IsVoid => f.write_str("isvoid"),
            ExprKind::Not => f.write_str("'not' expression"),
            ExprKind::Neg => f.write_str("'~' expression"),
            ExprKind::Arithmetic(op) | ExprKind::Compare(op) => {
                write!(f, "'{}' expression", op.symbol())
            }
            ExprKind::Equal => f.write_str("'=' expression"),
            ExprKind::Paren => f.write_str("parenthesized expression"),
            ExprKind::ObjectRef => f.write_str("object reference"),
            ExprKind::IntConst => f.write_str("integer constant"),
            ExprKind::StringConst => f.write_str("string constant"),
            ExprKind::BoolConst => f.write_str("boolean constant"),
            ExprKind::SelfRef => f.write_str("self"),
            ExprKind::NoExpr => f.write_str("no expression"),
        }
    }
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Assign { .. } => ExprKind::Assign,
            Expr::Dispatch { .. } => ExprKind::Dispatch,
            Expr::StaticDispatch { .. } => ExprKind::StaticDispatch,
            Expr::If { .. } => ExprKind::Cond,
            Expr::While { .. } => ExprKind::Loop,
            Expr::Block(_) => ExprKind::Block,
            Expr::Let(_) => ExprKind::Let,
            Expr::Case { .. } => ExprKind::Case,
            Expr::New(_) => ExprKind::New,
            Expr::IsVoid(_) => ExprKind::IsVoid,
            Expr::Not(_) => ExprKind::Not,
            Expr::Neg(_) => ExprKind::Neg,
            Expr::Bin { op, .. } if op.is_arithmetic() => ExprKind::Arithmetic(*op),
            Expr::Bin { op, .. } if op.is_comparison() => ExprKind::Compare(*op),
            Expr::Bin { .. } => ExprKind::Equal,
            Expr::Paren(_) => ExprKind::Paren,
            Expr::Id(_) => ExprKind::ObjectRef,
            Expr::Int(_) => ExprKind::IntConst,
            Expr::Str(_) => ExprKind::StringConst,
            Expr::Bool(_) => ExprKind::BoolConst,
            Expr::Self_ => ExprKind::SelfRef,
            Expr::NoExpr => ExprKind::NoExpr,
        }
    }

    pub fn is_no_expr(&self) -> bool {
        matches!(self, Expr::NoExpr)
    }

    /// The expression with any enclosing parentheses removed.
    pub fn without_parens(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren(inner) = expr {
            expr = inner.as_ref();
        }
        expr
    }

    pub fn let_binding(&self) -> Option<&LetBinding> {
        match self {
            Expr::Let(binding) => Some(binding),
            _ => None,
        }
    }

    /// Direct children in evaluation order.
    pub fn nested_expressions(&self) -> Vec<&Expr> {
        match self {
            Expr::Assign { expr, .. } => vec![expr.as_ref()],
            Expr::Dispatch { recv, args, .. } | Expr::StaticDispatch { recv, args, .. } => {
                std::iter::once(recv.as_ref()).chain(args.iter()).collect()
            }
            Expr::If { cond, then_, else_ } => vec![cond.as_ref(), then_.as_ref(), else_.as_ref()],
            Expr::While { cond, body } => vec![cond.as_ref(), body.as_ref()],
            Expr::Block(exprs) => exprs.iter().collect(),
            Expr::Let(binding) => vec![binding.init.as_ref(), binding.body.as_ref()],
            Expr::Case { expr, arms } => std::iter::once(expr.as_ref())
                .chain(arms.iter().map(|arm| &arm.expr))
                .collect(),
            Expr::IsVoid(inner) | Expr::Not(inner) | Expr::Neg(inner) | Expr::Paren(inner) => {
                vec![inner.as_ref()]
            }
            Expr::Bin { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            Expr::New(_)
            | Expr::Id(_)
            | Expr::Int(_)
            | Expr::Str(_)
            | Expr::Bool(_)
            | Expr::Self_
            | Expr::NoExpr => Vec::new(),
        }
    }
}
