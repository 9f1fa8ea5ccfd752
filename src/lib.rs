mod builtins;
mod environment;
mod exception;
mod expressions;
mod frontend;
mod graph;
mod io;
mod run;
mod value;

pub use crate::{
    environment::{Environment, MapEnvironment},
    exception::{RunResult, SemanticError},
    frontend::{FrontendError, parse_program},
    graph::{
        AssignTarget, Element, Expr, ExprCall, Graph, Operator, PrintArg, Rhs, Statement, StmtId,
    },
    io::{CollectStringPrint, InputReader, PrintWriter, ScriptedInput, StdInput, StdPrint},
    run::execute,
    value::Value,
};
