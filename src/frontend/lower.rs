//! AST-to-graph lowering. One function per source construct, mirroring the
//! teacher's `parse_statement_impl`/`parse_expression_impl` split, but
//! producing [`Statement`] nodes wired through [`Graph::patch_next`] instead
//! of a tree `Node`.
//!
//! Two shapes recur throughout:
//!
//! - A statement lowers to `(StmtId, Vec<StmtId>)`: the entry point of the
//!   (possibly multi-node) chain it expands to, and the "open" successors
//!   that still need patching to whatever follows.
//! - An expression that must become a single [`Element`] — an operand, a
//!   condition's left/right side, a call argument — lowers to
//!   `(Element, Vec<StmtId>)`: the element itself, plus zero or more
//!   temporary-assignment statements that must run immediately before it is
//!   read. This is how nested expressions (anything deeper than one
//!   `element OP element` level) get flattened into `__t<N>` assignments,
//!   per the distilled spec's flat expression-tree constraint (§3).

use ruff_python_ast::{
    self as ast, CmpOp, ElifElseClause, Expr as AstExpr, Number, Operator as AstOperator, Stmt, UnaryOp,
};
use ruff_text_size::{Ranged, TextRange};

use super::{FrontendError, LineIndex};
use crate::graph::{AssignTarget, Element, Expr, ExprCall, Graph, Operator, PrintArg, Rhs, Statement, StmtId};

pub(super) struct LowerCtx {
    pub(super) graph: Graph,
    line_index: LineIndex,
    tmp_counter: u32,
}

impl LowerCtx {
    pub(super) fn new(source: &str) -> Self {
        Self { graph: Graph::new(), line_index: LineIndex::new(source), tmp_counter: 0 }
    }

    fn line_of(&self, range: TextRange) -> u32 {
        self.line_index.line_number(range.start().into())
    }

    fn next_temp(&mut self) -> String {
        let name = format!("__t{}", self.tmp_counter);
        self.tmp_counter += 1;
        name
    }
}

/// Prepends a chain of temp-assignment statements (already `next: None`,
/// in execution order) in front of `entry`, wiring each to the next and the
/// last to `entry`. Returns the new chain head — `entry` itself if `pre` is
/// empty.
fn prepend_pre(pre: Vec<StmtId>, entry: StmtId, ctx: &mut LowerCtx) -> StmtId {
    for pair in pre.windows(2) {
        ctx.graph.patch_next(pair[0], pair[1]);
    }
    if let Some(&last) = pre.last() {
        ctx.graph.patch_next(last, entry);
        pre[0]
    } else {
        entry
    }
}

/// Lowers a block of statements to its entry point and the dangling
/// successors its last statement leaves open. `None`/empty for an empty
/// block (only reachable at module top level — `if`/`while` bodies are
/// never empty in valid Python syntax).
pub(super) fn lower_block(stmts: Vec<Stmt>, ctx: &mut LowerCtx) -> Result<(Option<StmtId>, Vec<StmtId>), FrontendError> {
    let mut entry: Option<StmtId> = None;
    let mut pending_tails: Vec<StmtId> = Vec::new();
    for stmt in stmts {
        let (node_entry, node_tails) = lower_stmt(stmt, ctx)?;
        if entry.is_none() {
            entry = Some(node_entry);
        } else {
            for tail in &pending_tails {
                ctx.graph.patch_next(*tail, node_entry);
            }
        }
        pending_tails = node_tails;
    }
    Ok((entry, pending_tails))
}

fn lower_stmt(stmt: Stmt, ctx: &mut LowerCtx) -> Result<(StmtId, Vec<StmtId>), FrontendError> {
    match stmt {
        Stmt::Assign(ast::StmtAssign { targets, value, range, .. }) => lower_assign(targets, *value, range, ctx),
        Stmt::Expr(ast::StmtExpr { value, range, .. }) => lower_expr_stmt(*value, range, ctx),
        Stmt::Pass(ast::StmtPass { range, .. }) => {
            let line = ctx.line_of(range);
            let id = ctx.graph.push(Statement::Pass { line, next: None });
            Ok((id, vec![id]))
        }
        Stmt::If(ast::StmtIf { test, body, elif_else_clauses, range, .. }) => {
            lower_if(*test, body, elif_else_clauses, range, ctx)
        }
        Stmt::While(ast::StmtWhile { test, body, orelse, range, .. }) => {
            if !orelse.is_empty() {
                return Err(FrontendError::new("while/else is not supported", ctx.line_of(range)));
            }
            lower_while(*test, body, range, ctx)
        }
        other => Err(FrontendError::new(format!("unsupported statement: {other:?}"), ctx.line_of(other.range()))),
    }
}

fn lower_assign(targets: Vec<AstExpr>, value: AstExpr, range: TextRange, ctx: &mut LowerCtx) -> Result<(StmtId, Vec<StmtId>), FrontendError> {
    let line = ctx.line_of(range);
    if targets.len() != 1 {
        return Err(FrontendError::new("only single-target assignment is supported", line));
    }
    let target = lower_target(targets.into_iter().next().unwrap(), ctx, line)?;
    let (rhs, pre) = lower_rhs(value, ctx)?;
    let id = ctx.graph.push(Statement::Assign { line, target, rhs, next: None });
    let entry = prepend_pre(pre, id, ctx);
    Ok((entry, vec![id]))
}

/// `name = ...` or the `deref(name) = ...` sugar for a pointer-dereferenced
/// store (the language subset has no unary `*`, so this call-like spelling
/// stands in for it).
fn lower_target(expr: AstExpr, ctx: &mut LowerCtx, line: u32) -> Result<AssignTarget, FrontendError> {
    match expr {
        AstExpr::Name(ast::ExprName { id, .. }) => Ok(AssignTarget { name: id.as_str().to_string(), dereference: false }),
        AstExpr::Call(ast::ExprCall { func, arguments, .. }) => {
            let AstExpr::Name(ast::ExprName { id, .. }) = *func else {
                return Err(FrontendError::new("unsupported assignment target", line));
            };
            if id.as_str() != "deref" {
                return Err(FrontendError::new("unsupported assignment target", line));
            }
            let mut args = arguments.args.into_vec();
            if args.len() != 1 {
                return Err(FrontendError::new("deref() takes exactly one argument", line));
            }
            match args.remove(0) {
                AstExpr::Name(ast::ExprName { id, .. }) => Ok(AssignTarget { name: id.as_str().to_string(), dereference: true }),
                _ => Err(FrontendError::new("deref() argument must be a variable name", line)),
            }
        }
        _ => Err(FrontendError::new("unsupported assignment target", line)),
    }
}

/// A bare expression statement: only a call is meaningful (`print(...)` is
/// the intended case; any other callee still lowers so the dispatcher's
/// `UnknownFunctionStatement` stays reachable at run time rather than being
/// rejected here).
fn lower_expr_stmt(value: AstExpr, range: TextRange, ctx: &mut LowerCtx) -> Result<(StmtId, Vec<StmtId>), FrontendError> {
    let line = ctx.line_of(range);
    let AstExpr::Call(ast::ExprCall { func, arguments, .. }) = value else {
        return Err(FrontendError::new("only call expressions are supported as statements", line));
    };
    let AstExpr::Name(ast::ExprName { id, .. }) = *func else {
        return Err(FrontendError::new("unsupported call target", line));
    };
    let mut args = arguments.args.into_vec();
    let (arg, pre) = match args.len() {
        0 => (PrintArg::Nothing, vec![]),
        1 => {
            let (element, pre) = lower_operand(args.remove(0), ctx)?;
            (PrintArg::Element(element), pre)
        }
        _ => return Err(FrontendError::new("print() accepts at most one argument", line)),
    };
    let id = ctx.graph.push(Statement::Call { line, name: id.as_str().to_string(), arg, next: None });
    let entry = prepend_pre(pre, id, ctx);
    Ok((entry, vec![id]))
}

fn lower_if(
    test: AstExpr,
    body: Vec<Stmt>,
    elif_else_clauses: Vec<ElifElseClause>,
    range: TextRange,
    ctx: &mut LowerCtx,
) -> Result<(StmtId, Vec<StmtId>), FrontendError> {
    let line = ctx.line_of(range);
    let (body_entry, body_tails) = lower_block(body, ctx)?;
    let (else_entry, else_tails) = lower_else_clauses(elif_else_clauses.into_iter(), ctx)?;
    let (cond, pre) = lower_cond(test, ctx)?;
    let id = ctx.graph.push(Statement::If { line, cond, true_path: body_entry, false_path: else_entry });
    let entry = prepend_pre(pre, id, ctx);
    let mut tails = vec![id];
    tails.extend(body_tails);
    tails.extend(else_tails);
    Ok((entry, tails))
}

/// Recurses down an `elif`/`else` chain, turning each `elif` into a nested
/// `If` (mirroring the teacher's `parse_elif_else_clauses`) rather than the
/// teacher's plain-`Vec<ParseNode>` `or_else`, since this graph has no node
/// for "a sequence of statements" other than the chain itself.
fn lower_else_clauses(
    mut clauses: std::vec::IntoIter<ElifElseClause>,
    ctx: &mut LowerCtx,
) -> Result<(Option<StmtId>, Vec<StmtId>), FrontendError> {
    let Some(clause) = clauses.next() else {
        return Ok((None, vec![]));
    };
    match clause.test {
        Some(test) => {
            let line = ctx.line_of(clause.range);
            let (body_entry, body_tails) = lower_block(clause.body, ctx)?;
            let (rest_entry, rest_tails) = lower_else_clauses(clauses, ctx)?;
            let (cond, pre) = lower_cond(test, ctx)?;
            let id = ctx.graph.push(Statement::If { line, cond, true_path: body_entry, false_path: rest_entry });
            let entry = prepend_pre(pre, id, ctx);
            let mut tails = vec![id];
            tails.extend(body_tails);
            tails.extend(rest_tails);
            Ok((Some(entry), tails))
        }
        None => lower_block(clause.body, ctx),
    }
}

/// The body's dangling tails loop back to the *start of the pre-chain*, not
/// to the `While` node directly, so a condition requiring flattening (e.g.
/// `while f(x) < 3:`) gets recomputed every iteration rather than reusing
/// the first pass's temporary.
fn lower_while(test: AstExpr, body: Vec<Stmt>, range: TextRange, ctx: &mut LowerCtx) -> Result<(StmtId, Vec<StmtId>), FrontendError> {
    let line = ctx.line_of(range);
    let (body_entry, body_tails) = lower_block(body, ctx)?;
    let (cond, pre) = lower_cond(test, ctx)?;
    let id = ctx.graph.push(Statement::While { line, cond, loop_body: body_entry, next: None });
    let entry = prepend_pre(pre, id, ctx);
    for tail in body_tails {
        ctx.graph.patch_next(tail, entry);
    }
    Ok((entry, vec![id]))
}

/// A condition is the same one-level `element OP element` shape as any other
/// expression; `and`/`or` chains are not supported (the flat model has no
/// short-circuit node), a limitation carried over from the distilled spec's
/// expression grammar rather than invented here.
fn lower_cond(test: AstExpr, ctx: &mut LowerCtx) -> Result<(Expr, Vec<StmtId>), FrontendError> {
    let line = ctx.line_of(test.range());
    match lower_rhs(test, ctx)? {
        (Rhs::Expr(expr), pre) => Ok((expr, pre)),
        (Rhs::Call(_), _) => Err(FrontendError::new("call expressions are not supported as conditions", line)),
    }
}

/// Lowers the right-hand side of an assignment (or, via [`lower_cond`], a
/// condition) to either a built-in call or a one-level expression.
fn lower_rhs(expr: AstExpr, ctx: &mut LowerCtx) -> Result<(Rhs, Vec<StmtId>), FrontendError> {
    match expr {
        AstExpr::Call(ast::ExprCall { func, arguments, range, .. }) => lower_call(*func, arguments, range, ctx),
        AstExpr::BinOp(ast::ExprBinOp { left, op, right, range, .. }) => {
            let line = ctx.line_of(range);
            let operator = convert_binop(op, line)?;
            let (left, mut pre) = lower_operand(*left, ctx)?;
            let (right, pre_right) = lower_operand(*right, ctx)?;
            pre.extend(pre_right);
            Ok((Rhs::Expr(Expr::Binary(left, operator, right)), pre))
        }
        AstExpr::Compare(ast::ExprCompare { left, ops, comparators, range, .. }) => {
            let line = ctx.line_of(range);
            let ops_vec = ops.into_vec();
            let comparators_vec = comparators.into_vec();
            if ops_vec.len() != 1 {
                return Err(FrontendError::new("chained comparisons are not supported", line));
            }
            let operator = convert_cmpop(ops_vec.into_iter().next().unwrap(), line)?;
            let (left, mut pre) = lower_operand(*left, ctx)?;
            let (right, pre_right) = lower_operand(comparators_vec.into_iter().next().unwrap(), ctx)?;
            pre.extend(pre_right);
            Ok((Rhs::Expr(Expr::Binary(left, operator, right)), pre))
        }
        AstExpr::UnaryOp(ast::ExprUnaryOp { op, operand, range, .. }) => {
            let line = ctx.line_of(range);
            match op {
                UnaryOp::USub => {
                    let (operand, pre) = lower_operand(*operand, ctx)?;
                    Ok((Rhs::Expr(Expr::Binary(Element::IntLiteral("0".into()), Operator::Sub, operand)), pre))
                }
                UnaryOp::UAdd => {
                    let (operand, pre) = lower_operand(*operand, ctx)?;
                    Ok((Rhs::Expr(Expr::Unary(operand)), pre))
                }
                UnaryOp::Not | UnaryOp::Invert => Err(FrontendError::new("unsupported unary operator", line)),
            }
        }
        other => {
            let (element, pre) = lower_operand(other, ctx)?;
            Ok((Rhs::Expr(Expr::Unary(element)), pre))
        }
    }
}

/// Lowers any expression to a single [`Element`], synthesizing a `__t<N>`
/// temp assignment first when the expression isn't already a literal or a
/// bare name (§3's flattening rule).
fn lower_operand(expr: AstExpr, ctx: &mut LowerCtx) -> Result<(Element, Vec<StmtId>), FrontendError> {
    match expr {
        AstExpr::Name(ast::ExprName { id, .. }) => Ok((Element::Identifier(id.as_str().to_string()), vec![])),
        AstExpr::BooleanLiteral(ast::ExprBooleanLiteral { value, .. }) => {
            Ok((if value { Element::True } else { Element::False }, vec![]))
        }
        AstExpr::StringLiteral(ast::ExprStringLiteral { value, .. }) => {
            Ok((Element::StringLiteral(value.to_string()), vec![]))
        }
        AstExpr::NumberLiteral(ast::ExprNumberLiteral { value, range, .. }) => {
            let line = ctx.line_of(range);
            lower_number(value, line)
        }
        other => {
            let line = ctx.line_of(other.range());
            let (rhs, mut pre) = lower_rhs(other, ctx)?;
            let name = ctx.next_temp();
            let id = ctx.graph.push(Statement::Assign {
                line,
                target: AssignTarget { name: name.clone(), dereference: false },
                rhs,
                next: None,
            });
            pre.push(id);
            Ok((Element::Identifier(name), pre))
        }
    }
}

fn lower_number(value: Number, line: u32) -> Result<(Element, Vec<StmtId>), FrontendError> {
    match value {
        Number::Int(i) => match i.as_i64() {
            Some(i) => Ok((Element::IntLiteral(i.to_string()), vec![])),
            None => Err(FrontendError::new("integer literal too large", line)),
        },
        Number::Float(f) => Ok((Element::RealLiteral(f.to_string()), vec![])),
        Number::Complex { .. } => Err(FrontendError::new("complex literals are not supported", line)),
    }
}

fn lower_call(func: AstExpr, arguments: ast::Arguments, range: TextRange, ctx: &mut LowerCtx) -> Result<(Rhs, Vec<StmtId>), FrontendError> {
    let line = ctx.line_of(range);
    let AstExpr::Name(ast::ExprName { id, .. }) = func else {
        return Err(FrontendError::new("only named function calls are supported", line));
    };
    if !arguments.keywords.is_empty() {
        return Err(FrontendError::new("keyword arguments are not supported", line));
    }
    let name = id.as_str().to_string();
    let mut args = arguments.args.into_vec();
    match name.as_str() {
        "input" => {
            if args.len() != 1 {
                return Err(FrontendError::new("input() requires exactly one argument", line));
            }
            let (prompt, pre) = lower_operand(args.remove(0), ctx)?;
            Ok((Rhs::Call(ExprCall::Input { prompt }), pre))
        }
        "int" => {
            if args.len() != 1 {
                return Err(FrontendError::new("int() requires exactly one argument", line));
            }
            let (arg, pre) = lower_operand(args.remove(0), ctx)?;
            Ok((Rhs::Call(ExprCall::Int { arg }), pre))
        }
        "float" => {
            if args.len() != 1 {
                return Err(FrontendError::new("float() requires exactly one argument", line));
            }
            let (arg, pre) = lower_operand(args.remove(0), ctx)?;
            Ok((Rhs::Call(ExprCall::Float { arg }), pre))
        }
        _ => Ok((Rhs::Call(ExprCall::Unknown { name }), vec![])),
    }
}

fn convert_binop(op: AstOperator, line: u32) -> Result<Operator, FrontendError> {
    match op {
        AstOperator::Add => Ok(Operator::Add),
        AstOperator::Sub => Ok(Operator::Sub),
        AstOperator::Mult => Ok(Operator::Mul),
        AstOperator::Div => Ok(Operator::Div),
        AstOperator::Mod => Ok(Operator::Mod),
        AstOperator::Pow => Ok(Operator::Pow),
        other => Err(FrontendError::new(format!("unsupported binary operator {other:?}"), line)),
    }
}

fn convert_cmpop(op: CmpOp, line: u32) -> Result<Operator, FrontendError> {
    match op {
        CmpOp::Eq => Ok(Operator::Eq),
        CmpOp::NotEq => Ok(Operator::NotEq),
        CmpOp::Lt => Ok(Operator::Lt),
        CmpOp::LtE => Ok(Operator::LtE),
        CmpOp::Gt => Ok(Operator::Gt),
        CmpOp::GtE => Ok(Operator::GtE),
        other => Err(FrontendError::new(format!("unsupported comparison operator {other:?}"), line)),
    }
}
