use crate::{
    environment::Environment,
    exception::{RunResult, SemanticError},
    graph::Element,
    value::Value,
};

/// `int(name)`: the parameter must be an identifier bound to a `Str`. Converts
/// via the "parse leading integer" rule (the original's `atoi`): an optional
/// sign and leading digits are consumed and parsed, trailing garbage is
/// ignored (`"42abc"` -> `42`). A result of `0` is only accepted when the
/// source string is itself all-zeros (`"0"`, `"00"`); a `0` produced because no
/// digits were found at all (`"abc"`) fails `InvalidStringForInt`.
pub(crate) fn call_int(arg: &Element, env: &impl Environment, line: u32) -> RunResult<Value> {
    let text = string_operand(
        arg,
        env,
        SemanticError::IntRequiresVariable { line },
        SemanticError::IntRequiresString { line },
    )?;
    let value = parse_leading_int(text);
    if value == 0 && !is_all_zeros(text) {
        return Err(SemanticError::InvalidStringForInt { line });
    }
    Ok(Value::Int(value))
}

/// `float(name)`: analogous to [`call_int`] (the original's `atof`), but the
/// leading prefix may also include a decimal point and exponent, the result is
/// `Real`, and all-zero-or-dot strings (`"0.0"`, `"00"`) are the accepted
/// zero forms.
pub(crate) fn call_float(arg: &Element, env: &impl Environment, line: u32) -> RunResult<Value> {
    let text = string_operand(
        arg,
        env,
        SemanticError::FloatRequiresVariable { line },
        SemanticError::FloatRequiresString { line },
    )?;
    let value = parse_leading_float(text);
    if value == 0.0 && !is_all_zeros_or_dot(text) {
        return Err(SemanticError::InvalidStringForFloat { line });
    }
    Ok(Value::Real(value))
}

/// Resolves `arg` to the string it must name: fails `not_a_variable` if `arg`
/// isn't an identifier, `not_a_string` if the identifier isn't bound to a `Str`.
fn string_operand<'env>(
    arg: &Element,
    env: &'env impl Environment,
    not_a_variable: SemanticError,
    not_a_string: SemanticError,
) -> RunResult<&'env str> {
    let Element::Identifier(name) = arg else {
        return Err(not_a_variable);
    };
    match env.read_by_name(name) {
        Some(Value::Str(s)) => Ok(s.as_str()),
        _ => Err(not_a_string),
    }
}

fn is_all_zeros(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '0')
}

fn is_all_zeros_or_dot(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '0' || c == '.')
}

/// `atoi`-style leading-integer parse: optional sign, then a run of ASCII
/// digits; trailing (or entirely absent) non-digit content is ignored. Yields
/// `0` when no digits are present. Overflow saturates to `i64::MIN`/`MAX`
/// rather than wrapping, since the original's undefined overflow behavior has
/// no faithful Rust equivalent to reproduce.
fn parse_leading_int(s: &str) -> i64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    trimmed[..end]
        .parse::<i64>()
        .unwrap_or(if trimmed.as_bytes()[0] == b'-' { i64::MIN } else { i64::MAX })
}

/// `atof`-style leading-float parse: optional sign, integer digits, optional
/// `.` and fractional digits, optional `e`/`E` exponent. Yields `0.0` when no
/// digits are present anywhere in the mantissa.
fn parse_leading_float(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut saw_digit = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        saw_digit = true;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return 0.0;
    }
    let mantissa_end = i;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_digits_start {
            i = j;
        }
    }
    let _ = mantissa_end;
    trimmed[..i].parse::<f64>().unwrap_or(0.0)
}
