use std::fmt;

/// Result type alias for operations that can halt execution with a semantic error.
pub type RunResult<T> = Result<T, SemanticError>;

/// The flat taxonomy of runtime failures the core can raise.
///
/// Every variant carries the source line on which the failing statement or
/// expression appeared, matching the `(line <N>)` suffix of the wire format in
/// [`SemanticError::message`]. There is exactly one handling policy: the first
/// error halts the dispatcher (see `run::execute`); none of these are caught or
/// retried internally.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    NameUndefined { name: String, line: u32 },
    ModByZero { line: u32 },
    DivByZero { line: u32 },
    TypeError { line: u32 },
    InvalidAddress { line: u32 },
    UnknownFunctionStatement { line: u32 },
    UnknownFunctionExpr { name: String, line: u32 },
    InputRequiresStringLiteral { line: u32 },
    IntRequiresVariable { line: u32 },
    IntRequiresString { line: u32 },
    InvalidStringForInt { line: u32 },
    FloatRequiresVariable { line: u32 },
    FloatRequiresString { line: u32 },
    InvalidStringForFloat { line: u32 },
    ConditionNotBoolean { line: u32 },
}

impl SemanticError {
    /// The source line the error is attributed to.
    pub fn line(&self) -> u32 {
        match self {
            SemanticError::NameUndefined { line, .. }
            | SemanticError::ModByZero { line }
            | SemanticError::DivByZero { line }
            | SemanticError::TypeError { line }
            | SemanticError::InvalidAddress { line }
            | SemanticError::UnknownFunctionStatement { line }
            | SemanticError::UnknownFunctionExpr { line, .. }
            | SemanticError::InputRequiresStringLiteral { line }
            | SemanticError::IntRequiresVariable { line }
            | SemanticError::IntRequiresString { line }
            | SemanticError::InvalidStringForInt { line }
            | SemanticError::FloatRequiresVariable { line }
            | SemanticError::FloatRequiresString { line }
            | SemanticError::InvalidStringForFloat { line }
            | SemanticError::ConditionNotBoolean { line } => *line,
        }
    }

    /// The stable message text, matching the catalog in the external interface spec.
    /// Does not include the `(line <N>)` suffix; use [`Display`](fmt::Display) for that.
    pub fn message(&self) -> String {
        match self {
            SemanticError::NameUndefined { name, .. } => format!("name '{name}' is not defined"),
            SemanticError::ModByZero { .. } => "mod by 0".to_owned(),
            SemanticError::DivByZero { .. } => "divide by 0".to_owned(),
            SemanticError::TypeError { .. } => "invalid operand types".to_owned(),
            SemanticError::InvalidAddress { .. } => "invalid memory address for assignment".to_owned(),
            SemanticError::UnknownFunctionStatement { .. } => "unknown function".to_owned(),
            SemanticError::UnknownFunctionExpr { name, .. } => format!("unknown function '{name}'"),
            SemanticError::InputRequiresStringLiteral { .. } => "input() requires a string literal".to_owned(),
            SemanticError::IntRequiresVariable { .. } => "int() requires a variable".to_owned(),
            SemanticError::IntRequiresString { .. } => "int() requires a string".to_owned(),
            SemanticError::InvalidStringForInt { .. } => "invalid string for int()".to_owned(),
            SemanticError::FloatRequiresVariable { .. } => "float() requires a variable".to_owned(),
            SemanticError::FloatRequiresString { .. } => "float() requires a string".to_owned(),
            SemanticError::InvalidStringForFloat { .. } => "invalid string for float()".to_owned(),
            SemanticError::ConditionNotBoolean { .. } => "condition must evaluate to integer or boolean".to_owned(),
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**SEMANTIC ERROR: {} (line {})", self.message(), self.line())
    }
}

impl std::error::Error for SemanticError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_matches_spec() {
        let err = SemanticError::DivByZero { line: 3 };
        assert_eq!(err.to_string(), "**SEMANTIC ERROR: divide by 0 (line 3)");
    }

    #[test]
    fn name_undefined_interpolates_identifier() {
        let err = SemanticError::NameUndefined {
            name: "x".to_owned(),
            line: 1,
        };
        assert_eq!(err.to_string(), "**SEMANTIC ERROR: name 'x' is not defined (line 1)");
    }
}
