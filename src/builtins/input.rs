use crate::{
    exception::{RunResult, SemanticError},
    graph::Element,
    io::{InputReader, PrintWriter},
    value::Value,
};

/// `input(prompt)`: the parameter must be a string literal. Writes the prompt
/// without a trailing newline, then reads one line (stripped, truncated to
/// 255 bytes by the [`InputReader`] contract) and returns it as `Value::Str`.
pub(crate) fn call_input(
    prompt: &Element,
    writer: &mut impl PrintWriter,
    input: &mut impl InputReader,
    line: u32,
) -> RunResult<Value> {
    let Element::StringLiteral(text) = prompt else {
        return Err(SemanticError::InputRequiresStringLiteral { line });
    };
    writer.stdout_write(text);
    let line_read = input.read_line().map_err(|_| SemanticError::InputRequiresStringLiteral { line })?;
    Ok(Value::Str(line_read))
}
