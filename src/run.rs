//! Public interface for running a program graph: the control dispatcher
//! (§4.6), the assignment executor (§4.4), and the statement-level call
//! executor (§4.5, delegating to `builtins::print_statement`).

use crate::{
    builtins::{call_float, call_input, call_int, print_statement},
    environment::Environment,
    exception::{RunResult, SemanticError},
    expressions::eval,
    graph::{AssignTarget, ExprCall, Graph, Rhs, Statement, StmtId},
    io::{InputReader, PrintWriter},
    value::Value,
};

/// Walks the graph starting at `root` until the cursor runs out of successors
/// or a statement raises a [`SemanticError`].
///
/// On error, the diagnostic has already been written to `writer` in the exact
/// `**SEMANTIC ERROR: <message> (line <N>)` wire format before this returns —
/// callers that only care about pass/fail can discard the `Err` payload, and
/// callers that want the structured error still get it back.
pub fn execute(
    graph: &Graph,
    root: StmtId,
    env: &mut impl Environment,
    writer: &mut impl PrintWriter,
    input: &mut impl InputReader,
) -> RunResult<()> {
    let mut cursor = Some(root);
    while let Some(id) = cursor {
        cursor = match step(graph.get(id), env, writer, input) {
            Ok(next) => next,
            Err(err) => {
                writer.stdout_write(&err.to_string());
                writer.stdout_push('\n');
                return Err(err);
            }
        };
    }
    Ok(())
}

/// Executes one statement and returns the successor the dispatcher should
/// visit next. This is the exhaustive `match` described in §4.6 — there is no
/// `other`/`UnknownStatement` arm because `Statement` has no sixth variant.
fn step(
    stmt: &Statement,
    env: &mut impl Environment,
    writer: &mut impl PrintWriter,
    input: &mut impl InputReader,
) -> RunResult<Option<StmtId>> {
    match stmt {
        Statement::Assign { line, target, rhs, next } => {
            run_assignment(target, rhs, env, writer, input, *line)?;
            Ok(*next)
        }
        Statement::Call { line, name, arg, next } => {
            if name == "print" {
                print_statement(arg, env, writer, *line)?;
                Ok(*next)
            } else {
                Err(SemanticError::UnknownFunctionStatement { line: *line })
            }
        }
        Statement::Pass { next, .. } => Ok(*next),
        Statement::If { line, cond, true_path, false_path } => {
            if truthy(&eval(cond, env, *line)?, *line)? {
                Ok(*true_path)
            } else {
                Ok(*false_path)
            }
        }
        Statement::While { line, cond, loop_body, next } => {
            if truthy(&eval(cond, env, *line)?, *line)? {
                Ok(*loop_body)
            } else {
                Ok(*next)
            }
        }
    }
}

fn truthy(value: &Value, line: u32) -> RunResult<bool> {
    value.truthiness().ok_or(SemanticError::ConditionNotBoolean { line })
}

/// Evaluates the right-hand side and writes it through the target (§4.4).
///
/// For a pointer-dereferenced target, the current value of `target.name` is
/// read out *before* the right-hand side is written through the address. Since
/// `Value::Int`'s payload is a plain `i64`, extracting the address never
/// aliases the value being written — there is no ordering hazard to preserve
/// from the source language's buffer-reuse behavior (§9).
fn run_assignment(
    target: &AssignTarget,
    rhs: &Rhs,
    env: &mut impl Environment,
    writer: &mut impl PrintWriter,
    input: &mut impl InputReader,
    line: u32,
) -> RunResult<()> {
    let value = eval_rhs(rhs, env, writer, input, line)?;
    if target.dereference {
        let addr = match env.read_by_name(&target.name) {
            Some(Value::Int(addr)) if *addr >= 0 => *addr as usize,
            _ => return Err(SemanticError::InvalidAddress { line }),
        };
        if !env.write_by_addr(addr, value) {
            return Err(SemanticError::InvalidAddress { line });
        }
    } else {
        env.write_by_name(target.name.clone(), value);
    }
    Ok(())
}

fn eval_rhs(
    rhs: &Rhs,
    env: &mut impl Environment,
    writer: &mut impl PrintWriter,
    input: &mut impl InputReader,
    line: u32,
) -> RunResult<Value> {
    match rhs {
        Rhs::Expr(expr) => eval(expr, env, line),
        Rhs::Call(ExprCall::Input { prompt }) => call_input(prompt, writer, input, line),
        Rhs::Call(ExprCall::Int { arg }) => call_int(arg, env, line),
        Rhs::Call(ExprCall::Float { arg }) => call_float(arg, env, line),
        Rhs::Call(ExprCall::Unknown { name }) => Err(SemanticError::UnknownFunctionExpr { name: name.clone(), line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        environment::MapEnvironment,
        graph::{Element, Operator, PrintArg},
        io::{CollectStringPrint, ScriptedInput},
        value::Value,
    };

    fn run(graph: &Graph, root: StmtId) -> (RunResult<()>, String, MapEnvironment) {
        let mut env = MapEnvironment::new();
        let mut writer = CollectStringPrint::new();
        let mut input = ScriptedInput::new(Vec::<String>::new());
        let result = execute(graph, root, &mut env, &mut writer, &mut input);
        (result, writer.into_output(), env)
    }

    /// Scenario 1: `x = 7`; `y = 5`; `print(x + y)` -> `12\n`.
    #[test]
    fn assignment_and_print() {
        let mut graph = Graph::new();
        let print_stmt = graph.push(Statement::Call {
            line: 3,
            name: "print".into(),
            arg: PrintArg::Element(Element::Identifier("__sum".into())),
            next: None,
        });
        let sum_stmt = graph.push(Statement::Assign {
            line: 3,
            target: AssignTarget { name: "__sum".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Binary(
                Element::Identifier("x".into()),
                Operator::Add,
                Element::Identifier("y".into()),
            )),
            next: Some(print_stmt),
        });
        let y_stmt = graph.push(Statement::Assign {
            line: 2,
            target: AssignTarget { name: "y".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Unary(Element::IntLiteral("5".into()))),
            next: Some(sum_stmt),
        });
        let x_stmt = graph.push(Statement::Assign {
            line: 1,
            target: AssignTarget { name: "x".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Unary(Element::IntLiteral("7".into()))),
            next: Some(y_stmt),
        });

        let (result, output, _env) = run(&graph, x_stmt);
        result.unwrap();
        assert_eq!(output, "12\n");
    }

    /// Scenario 4: divide-by-zero halts before `print("after")` runs.
    #[test]
    fn divide_by_zero_halts_before_later_print() {
        let mut graph = Graph::new();
        let after_print = graph.push(Statement::Call {
            line: 4,
            name: "print".into(),
            arg: PrintArg::Element(Element::StringLiteral("after".into())),
            next: None,
        });
        let c_stmt = graph.push(Statement::Assign {
            line: 3,
            target: AssignTarget { name: "c".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Binary(
                Element::Identifier("a".into()),
                Operator::Div,
                Element::Identifier("b".into()),
            )),
            next: Some(after_print),
        });
        let b_stmt = graph.push(Statement::Assign {
            line: 2,
            target: AssignTarget { name: "b".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Unary(Element::IntLiteral("0".into()))),
            next: Some(c_stmt),
        });
        let a_stmt = graph.push(Statement::Assign {
            line: 1,
            target: AssignTarget { name: "a".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Unary(Element::IntLiteral("10".into()))),
            next: Some(b_stmt),
        });

        let (result, output, _env) = run(&graph, a_stmt);
        assert_eq!(result.unwrap_err(), SemanticError::DivByZero { line: 3 });
        assert_eq!(output, "**SEMANTIC ERROR: divide by 0 (line 3)\n");
        assert!(!output.contains("after"));
    }

    /// Scenario 5: `i = 0`; `while i < 3: print(i); i = i + 1` -> `0\n1\n2\n`.
    #[test]
    fn while_loop_counts() {
        let mut graph = Graph::new();

        // Build bottom-up: increment -> print -> while -> init.
        let incr = graph.push(Statement::Assign {
            line: 3,
            target: AssignTarget { name: "i".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Binary(
                Element::Identifier("i".into()),
                Operator::Add,
                Element::IntLiteral("1".into()),
            )),
            next: None, // patched below to loop back to the while statement
        });
        let print_i = graph.push(Statement::Call {
            line: 2,
            name: "print".into(),
            arg: PrintArg::Element(Element::Identifier("i".into())),
            next: Some(incr),
        });
        let while_stmt = graph.push(Statement::While {
            line: 1,
            cond: crate::graph::Expr::Binary(Element::Identifier("i".into()), Operator::Lt, Element::IntLiteral("3".into())),
            loop_body: Some(print_i),
            next: None,
        });
        graph.patch_next(incr, while_stmt);
        let init = graph.push(Statement::Assign {
            line: 1,
            target: AssignTarget { name: "i".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Unary(Element::IntLiteral("0".into()))),
            next: Some(while_stmt),
        });

        let (result, output, _env) = run(&graph, init);
        result.unwrap();
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn pointer_dereferenced_assignment_writes_through_address() {
        let mut graph = Graph::new();
        let deref_assign = graph.push(Statement::Assign {
            line: 2,
            target: AssignTarget { name: "p".into(), dereference: true },
            rhs: Rhs::Expr(crate::graph::Expr::Unary(Element::IntLiteral("9".into()))),
            next: None,
        });
        let p_assign = graph.push(Statement::Assign {
            line: 1,
            target: AssignTarget { name: "p".into(), dereference: false },
            rhs: Rhs::Expr(crate::graph::Expr::Unary(Element::IntLiteral("0".into()))),
            next: Some(deref_assign),
        });

        let mut env = MapEnvironment::new();
        let mut writer = CollectStringPrint::new();
        let mut input = ScriptedInput::new(Vec::<String>::new());
        execute(&graph, p_assign, &mut env, &mut writer, &mut input).unwrap();
        assert_eq!(env.read_by_addr(0), Some(&Value::Int(9)));
    }
}
