//! Diff output formatter for showing changes
//!
//! This module provides:
//! - Unified diff display of a file rewrite
//! - Colored added/removed lines when writing to a terminal

use crate::metainfo::WriteResult;
use colored::Colorize;
use std::io::Write;

/// Lines of unchanged context around a hunk
const CONTEXT_LINES: usize = 3;

/// Diff formatter for showing file changes
pub struct DiffFormatter {
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(dry_run: bool, color: bool) -> Self {
        Self { dry_run, color }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> &'static str {
        if self.dry_run {
            "(dry-run) "
        } else {
            ""
        }
    }

    /// Write the change as a single unified diff hunk
    ///
    /// Writes nothing when the content is unchanged.
    pub fn format(&self, result: &WriteResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if !result.has_changes() {
            return Ok(());
        }

        let before: Vec<&str> = result.before.lines().collect();
        let after: Vec<&str> = result.after.lines().collect();

        // Changes are contiguous: trim the common head and tail
        let head = before
            .iter()
            .zip(after.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let max_tail = before.len().min(after.len()) - head;
        let tail = before
            .iter()
            .rev()
            .zip(after.iter().rev())
            .take(max_tail)
            .take_while(|(a, b)| a == b)
            .count();

        let start = head.saturating_sub(CONTEXT_LINES);
        let before_end = (before.len() - tail + CONTEXT_LINES).min(before.len());
        let after_end = (after.len() - tail + CONTEXT_LINES).min(after.len());

        let prefix = self.dry_run_prefix();
        let path = result.path.display();
        writeln!(writer, "{}--- a/{}", prefix, path)?;
        writeln!(writer, "{}+++ b/{}", prefix, path)?;
        writeln!(
            writer,
            "@@ -{},{} +{},{} @@",
            start + 1,
            before_end - start,
            start + 1,
            after_end - start
        )?;

        for line in &before[start..head] {
            writeln!(writer, " {}", line)?;
        }
        for line in &before[head..before.len() - tail] {
            self.changed_line('-', line, writer)?;
        }
        for line in &after[head..after.len() - tail] {
            self.changed_line('+', line, writer)?;
        }
        for line in &after[after.len() - tail..after_end] {
            writeln!(writer, " {}", line)?;
        }
        Ok(())
    }

    fn changed_line(&self, sign: char, line: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        let text = format!("{}{}", sign, line);
        if !self.color {
            writeln!(writer, "{}", text)
        } else if sign == '+' {
            writeln!(writer, "{}", text.green())
        } else {
            writeln!(writer, "{}", text.red())
        }
    }
}
