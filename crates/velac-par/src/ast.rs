//! Abstract syntax tree.
//!
//! Every node owns its children outright (`spec.md` §3's ownership rule);
//! identifier and type-name payloads are borrowed `&str` source views
//! rather than owned strings, since the source buffer outlives parsing.

use velac_util::Span;

/// A whole source file: an ordered sequence of function definitions.
/// `spec.md` §6's grammar has no other top-level item.
#[derive(Debug, Clone)]
pub struct Ast<'src> {
    pub functions: Vec<FunctionDefinition<'src>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Or,
    And,
}

impl BinaryOp {
    /// `== != < > <= >= or and`, per the GLOSSARY definition.
    pub fn is_boolean_producing(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::Greater
                | BinaryOp::LessEqual
                | BinaryOp::GreaterEqual
                | BinaryOp::Or
                | BinaryOp::And
        )
    }

    /// `< > <= >=`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual
        )
    }
}

#[derive(Debug, Clone)]
pub enum Primary<'src> {
    Integer(i64),
    Floating(f64),
    Boolean(bool),
    Identifier(&'src str),
    Funcall {
        name: &'src str,
        arguments: Vec<Expression<'src>>,
    },
}

#[derive(Debug, Clone)]
pub enum Expression<'src> {
    Primary(Primary<'src>, Span),
    Binary {
        op: BinaryOp,
        lhs: Box<Expression<'src>>,
        rhs: Box<Expression<'src>>,
        span: Span,
    },
}

impl<'src> Expression<'src> {
    pub fn span(&self) -> Span {
        match self {
            Expression::Primary(_, span) => *span,
            Expression::Binary { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Statement<'src> {
    Block(Vec<Statement<'src>>, Span),
    LetAssignment {
        name: &'src str,
        expr: Expression<'src>,
        span: Span,
    },
    Return {
        expr: Option<Expression<'src>>,
        span: Span,
    },
}

impl<'src> Statement<'src> {
    pub fn span(&self) -> Span {
        match self {
            Statement::Block(_, span) => *span,
            Statement::LetAssignment { span, .. } => *span,
            Statement::Return { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameter<'src> {
    pub name: &'src str,
    pub type_name: &'src str,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionSignature<'src> {
    pub name: &'src str,
    pub parameters: Vec<Parameter<'src>>,
    pub return_type: &'src str,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDefinition<'src> {
    pub signature: FunctionSignature<'src>,
    pub body: Vec<Statement<'src>>,
    pub span: Span,
}
