//! Built-in call evaluator (distilled spec §4.3) and statement-level call
//! executor (§4.5). Split one file per built-in, matching the teacher
//! repository's `builtins/<name>.rs` convention.

mod convert;
mod input;
mod print;

pub(crate) use convert::{call_float, call_int};
pub(crate) use input::call_input;
pub(crate) use print::print_statement;
