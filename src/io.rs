//! I/O abstraction standing in for stdout/stdin, so the dispatcher and the
//! `print`/`input` built-ins never touch real file descriptors directly. This
//! mirrors the distilled spec's "Standard streams" interface (§6): line-oriented
//! stdin for `input`, line-oriented stdout for `print`, with unterminated prompts.

use std::io::{self, BufRead, Write as _};

/// Receives output from the `print` statement builtin and the `input` prompt.
pub trait PrintWriter {
    /// Writes `text` with no separators or trailing newline added.
    fn stdout_write(&mut self, text: &str);

    /// Writes a single trailing character (used for the newline after `print`).
    fn stdout_push(&mut self, ch: char);
}

/// Supplies input lines to the `input` builtin.
pub trait InputReader {
    /// Reads one line, stripped of its trailing `\r`/`\n`, truncated to 255 bytes.
    /// Returns an empty string at end of input.
    fn read_line(&mut self) -> io::Result<String>;
}

/// Default [`PrintWriter`] that writes straight to real stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, text: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn stdout_push(&mut self, ch: char) {
        let mut stdout = io::stdout();
        let mut buf = [0u8; 4];
        let _ = stdout.write_all(ch.encode_utf8(&mut buf).as_bytes());
        let _ = stdout.flush();
    }
}

/// Default [`InputReader`] that reads from real stdin.
#[derive(Debug, Default)]
pub struct StdInput;

impl InputReader for StdInput {
    fn read_line(&mut self) -> io::Result<String> {
        read_and_trim(&mut io::stdin().lock())
    }
}

/// [`PrintWriter`] that collects everything written into an owned `String`,
/// for tests that assert on captured output instead of real stdout.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    pub fn new() -> Self {
        Self(String::new())
    }

    pub fn output(&self) -> &str {
        &self.0
    }

    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, text: &str) {
        self.0.push_str(text);
    }

    fn stdout_push(&mut self, ch: char) {
        self.0.push(ch);
    }
}

/// [`InputReader`] that plays back a fixed sequence of lines, for tests that
/// simulate stdin without touching the real terminal.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: std::collections::VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputReader for ScriptedInput {
    fn read_line(&mut self) -> io::Result<String> {
        Ok(self.lines.pop_front().unwrap_or_default())
    }
}

/// Reads one line, truncates to 255 bytes (per the distilled spec's `input()`
/// contract), and strips a trailing `\r` and/or `\n`.
fn read_and_trim(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if line.len() > 255 {
        line.truncate(255);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_print_accumulates_writes() {
        let mut w = CollectStringPrint::new();
        w.stdout_write("hi");
        w.stdout_push('\n');
        assert_eq!(w.output(), "hi\n");
    }

    #[test]
    fn scripted_input_plays_back_lines_in_order() {
        let mut r = ScriptedInput::new(["42", "done"]);
        assert_eq!(r.read_line().unwrap(), "42");
        assert_eq!(r.read_line().unwrap(), "done");
        assert_eq!(r.read_line().unwrap(), "");
    }

    #[test]
    fn read_and_trim_strips_crlf_and_truncates() {
        let long_line = "a".repeat(300) + "\r\n";
        let mut reader = long_line.as_bytes();
        let line = read_and_trim(&mut reader).unwrap();
        assert_eq!(line.len(), 255);
    }
}
