use std::fmt;

/// Location of a node in the original source text, used for error
/// attribution. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
  pub line: usize,
  pub column: usize,
}

impl SourcePos {
  pub const fn new(line: usize, column: usize) -> Self {
    SourcePos { line, column }
  }
}

impl Default for SourcePos {
  fn default() -> Self {
    SourcePos { line: 1, column: 1 }
  }
}

impl fmt::Display for SourcePos {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "line {}, column {}", self.line, self.column)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Modulo,
  Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Plus,
  Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
}

/// Comparison guarding a `Conditional`. Comparisons are not
/// expressions of their own: the language is purely numeric, so a
/// comparison only ever appears as a branch guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
  pub op: ComparisonOp,
  pub left: Expr,
  pub right: Expr,
}

/// One node of the already-parsed expression tree.
///
/// Number literals keep their source text; the active number kind
/// converts them at evaluation time, which is what lets a single tree
/// be solved under any of the three kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Number {
    text: String,
    pos: SourcePos,
  },
  Identifier {
    name: String,
    pos: SourcePos,
  },
  FunctionCall {
    name: String,
    args: Vec<Expr>,
    pos: SourcePos,
  },
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
    pos: SourcePos,
  },
  UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
    pos: SourcePos,
  },
  /// Branches are evaluated lazily: only the selected branch runs.
  Conditional {
    condition: Box<Condition>,
    then_branch: Box<Expr>,
    else_branch: Box<Expr>,
    pos: SourcePos,
  },
}

impl Expr {
  pub fn number(text: impl Into<String>) -> Self {
    Expr::Number {
      text: text.into(),
      pos: SourcePos::default(),
    }
  }

  pub fn ident(name: impl Into<String>) -> Self {
    Expr::Identifier {
      name: name.into(),
      pos: SourcePos::default(),
    }
  }

  pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
    Expr::FunctionCall {
      name: name.into(),
      args,
      pos: SourcePos::default(),
    }
  }

  pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
    Expr::BinaryOp {
      op,
      left: Box::new(left),
      right: Box::new(right),
      pos: SourcePos::default(),
    }
  }

  pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
    Expr::UnaryOp {
      op,
      operand: Box::new(operand),
      pos: SourcePos::default(),
    }
  }

  pub fn conditional(
    condition: Condition,
    then_branch: Expr,
    else_branch: Expr,
  ) -> Self {
    Expr::Conditional {
      condition: Box::new(condition),
      then_branch: Box::new(then_branch),
      else_branch: Box::new(else_branch),
      pos: SourcePos::default(),
    }
  }

  /// Attach a source position, replacing the builder default.
  pub fn at(mut self, at: SourcePos) -> Self {
    match &mut self {
      Expr::Number { pos, .. }
      | Expr::Identifier { pos, .. }
      | Expr::FunctionCall { pos, .. }
      | Expr::BinaryOp { pos, .. }
      | Expr::UnaryOp { pos, .. }
      | Expr::Conditional { pos, .. } => *pos = at,
    }
    self
  }

  pub fn pos(&self) -> SourcePos {
    match self {
      Expr::Number { pos, .. }
      | Expr::Identifier { pos, .. }
      | Expr::FunctionCall { pos, .. }
      | Expr::BinaryOp { pos, .. }
      | Expr::UnaryOp { pos, .. }
      | Expr::Conditional { pos, .. } => *pos,
    }
  }
}

/// A top-level unit handed over by the parser: either an expression
/// to solve or a declaration to record in the symbol table.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
  Expression(Expr),
  VariableDecl {
    name: String,
    expr: Expr,
    pos: SourcePos,
  },
  FunctionDecl {
    name: String,
    params: Vec<String>,
    body: Expr,
    pos: SourcePos,
  },
}
