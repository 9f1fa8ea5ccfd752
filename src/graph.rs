//! The program graph: a doubly-linked arena of statements built by the frontend
//! and walked by the dispatcher in `run.rs`. The core never builds or mutates a
//! `Graph` itself — it only reads successor links and statement payloads.

/// Index into a [`Graph`]'s statement arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(u32);

impl StmtId {
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("program graph exceeds u32::MAX statements"))
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A leaf of an expression: a literal or an identifier reference.
///
/// Numeric literals carry their textual form and are parsed on demand by the
/// element reader, per the distilled spec's data model.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    IntLiteral(String),
    RealLiteral(String),
    StringLiteral(String),
    True,
    False,
    Identifier(String),
}

/// Binary and comparison operators recognized by the expression evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

impl Operator {
    /// Comparison operators are tested before arithmetic ones (§4.2): the
    /// arithmetic branch would otherwise mis-report some comparison operators
    /// as invalid for string operands.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::NotEq | Operator::Lt | Operator::LtE | Operator::Gt | Operator::GtE
        )
    }
}

/// An expression node: either a unary wrapper around a single element, or a
/// binary node over two elements. The parser/frontend has already resolved
/// precedence and flattened deeper nesting into temporaries (see `frontend`);
/// the core never re-associates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Unary(Element),
    Binary(Element, Operator, Element),
}

/// The three expression-context built-ins recognized on the right-hand side of
/// an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprCall {
    Input { prompt: Element },
    Int { arg: Element },
    Float { arg: Element },
    Unknown { name: String },
}

/// The right-hand side of an assignment: either an expression or a built-in call.
#[derive(Debug, Clone, PartialEq)]
pub enum Rhs {
    Expr(Expr),
    Call(ExprCall),
}

/// An assignment target: a plain name, or a name whose current value is
/// dereferenced as a cell address (the distilled spec's `pointer-dereference`
/// flag; see `frontend` for the `deref(name) = ...` surface syntax).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub name: String,
    pub dereference: bool,
}

/// The argument accepted by the statement-level `print` call.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintArg {
    Nothing,
    Element(Element),
}

/// A single node in the program graph.
///
/// Successor links vary by kind, matching the distilled spec's table:
/// assignment/call/pass carry a single `next`; `If` carries `true_path` and
/// `false_path`; `While` carries `loop_body` and `next` (the loop exit).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign {
        line: u32,
        target: AssignTarget,
        rhs: Rhs,
        next: Option<StmtId>,
    },
    /// A function call used as a statement. Only `print` is recognized by the
    /// dispatcher (§4.5); any other `name` reaches the dispatcher only to be
    /// turned into `UnknownFunctionStatement` — it is not rejected earlier so
    /// that the spec's runtime error (rather than a parse-time one) is exercised.
    Call {
        line: u32,
        name: String,
        arg: PrintArg,
        next: Option<StmtId>,
    },
    Pass {
        line: u32,
        next: Option<StmtId>,
    },
    If {
        line: u32,
        cond: Expr,
        true_path: Option<StmtId>,
        false_path: Option<StmtId>,
    },
    While {
        line: u32,
        cond: Expr,
        loop_body: Option<StmtId>,
        next: Option<StmtId>,
    },
}

impl Statement {
    pub fn line(&self) -> u32 {
        match self {
            Statement::Assign { line, .. }
            | Statement::Call { line, .. }
            | Statement::Pass { line, .. }
            | Statement::If { line, .. }
            | Statement::While { line, .. } => *line,
        }
    }
}

/// The statement arena itself. Built once by the frontend, then handed to
/// `run::execute` by shared reference for the lifetime of one run.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    statements: Vec<Statement>,
}

impl Graph {
    pub fn new() -> Self {
        Self { statements: Vec::new() }
    }

    /// Appends a statement and returns the id it was stored under.
    pub fn push(&mut self, statement: Statement) -> StmtId {
        let id = StmtId::new(self.statements.len());
        self.statements.push(statement);
        id
    }

    /// Fetches a statement by id. Panics on an out-of-range id, which would
    /// indicate a bug in the frontend (the core never constructs `StmtId`s
    /// itself, so any id it is handed must have come from this graph's `push`).
    pub fn get(&self, id: StmtId) -> &Statement {
        &self.statements[id.index()]
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Patches the successor link(s) of `id` that currently point nowhere
    /// (`None`) to point at `target`. Used by the frontend when wiring up
    /// convergence points for `if`/`else` branches and loop exits.
    pub(crate) fn patch_next(&mut self, id: StmtId, target: StmtId) {
        let stmt = &mut self.statements[id.index()];
        match stmt {
            Statement::Assign { next, .. } | Statement::Call { next, .. } | Statement::Pass { next, .. } => {
                if next.is_none() {
                    *next = Some(target);
                }
            }
            Statement::While { next, .. } => {
                if next.is_none() {
                    *next = Some(target);
                }
            }
            Statement::If { true_path, false_path, .. } => {
                if true_path.is_none() {
                    *true_path = Some(target);
                }
                if false_path.is_none() {
                    *false_path = Some(target);
                }
            }
        }
    }
}
