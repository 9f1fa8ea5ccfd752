//! Source-text front end (§4.0): parses a program with `ruff_python_parser`
//! and lowers the resulting AST into the flat [`Graph`](crate::graph::Graph)
//! the core walks. None of this module's output is covered by the distilled
//! spec's own contract — the graph it hands back is assumed well-formed by
//! `run::execute`, exactly as the spec's external lexer/parser collaborator is.

mod lower;

use std::fmt;

use ruff_python_parser::parse_module;
use ruff_text_size::Ranged;

use crate::graph::{Graph, StmtId};

/// A failure to parse or lower source text. Distinct from [`SemanticError`]:
/// this module never runs against a live environment, so it has no
/// `NameUndefined`-style runtime variants.
///
/// [`SemanticError`]: crate::exception::SemanticError
#[derive(Debug, Clone, PartialEq)]
pub struct FrontendError {
    message: String,
    line: u32,
}

impl FrontendError {
    pub(crate) fn new(message: impl Into<String>, line: u32) -> Self {
        Self { message: message.into(), line }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PARSE ERROR: {} (line {})", self.message, self.line)
    }
}

impl std::error::Error for FrontendError {}

/// Counts newlines once up front so every AST node's byte offset converts to
/// a 1-based line number in a single linear scan, the same shape as the
/// teacher's own `index_to_position` table (minus column tracking, which
/// nothing downstream needs).
pub(crate) struct LineIndex {
    line_ends: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let line_ends = source.char_indices().filter(|&(_, c)| c == '\n').map(|(i, _)| i).collect();
        Self { line_ends }
    }

    fn line_number(&self, offset: usize) -> u32 {
        let mut line_no: usize = 0;
        for &line_end in &self.line_ends {
            if offset <= line_end {
                break;
            }
            line_no += 1;
        }
        u32::try_from(line_no + 1).unwrap_or(u32::MAX)
    }
}

/// Parses `source` and lowers it into a graph. Returns `None` for the root
/// when the program has no statements at all.
pub fn parse_program(source: &str) -> Result<(Graph, Option<StmtId>), FrontendError> {
    let parsed = parse_module(source).map_err(|err| {
        let line_index = LineIndex::new(source);
        let offset: usize = err.range().start().into();
        FrontendError::new(err.to_string(), line_index.line_number(offset))
    })?;
    let module = parsed.into_syntax();
    let mut ctx = lower::LowerCtx::new(source);
    let (entry, _open_tails) = lower::lower_block(module.body, &mut ctx)?;
    Ok((ctx.graph, entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_counts_from_one() {
        let idx = LineIndex::new("aaa\nbbb\nccc");
        assert_eq!(idx.line_number(0), 1);
        assert_eq!(idx.line_number(4), 2);
        assert_eq!(idx.line_number(8), 3);
    }

    #[test]
    fn empty_source_parses_to_no_root() {
        let (graph, root) = parse_program("").unwrap();
        assert!(graph.is_empty());
        assert_eq!(root, None);
    }

    #[test]
    fn syntax_error_reports_a_line() {
        let err = parse_program("x = (").unwrap_err();
        assert!(err.line() >= 1);
    }
}
