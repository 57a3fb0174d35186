//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with in-memory implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.exists(parent) => {
                self.create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

/// Source of the root title when none is given on the command line.
pub trait TitlePrompt: Send + Sync {
    /// Show `message` and return the answer without its line ending.
    fn ask(&self, message: &str) -> io::Result<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Interactive prompt on stdin/stdout.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl TitlePrompt for StdinPrompt {
    fn ask(&self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", message.cyan())?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no title entered",
            ));
        }
        Ok(strip_line_ending(&line).to_string())
    }
}

/// Remove a trailing `\n` or `\r\n`, leaving other whitespace intact.
pub fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Inception\n", "Inception")]
    #[case("Inception\r\n", "Inception")]
    #[case(" Inception ", " Inception ")]
    #[case("", "")]
    fn given_prompt_answer_when_stripping_then_only_line_ending_removed(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(strip_line_ending(input), expected);
    }

    #[test]
    fn given_nested_output_path_when_ensuring_parent_then_creates_directories() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("out/graphs/tree.svg");

        RealFileSystem.ensure_parent(&target).unwrap();

        assert!(temp.path().join("out/graphs").is_dir());
    }
}
