//! Difference list printer.

use super::ansi_color;
use crate::diff::{Difference, DifferenceKind};
use std::fmt::Write as _;
use std::io;

/// Prints a difference list the way the `diff` command and the watch
/// stdout sink show it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferencePrinter {
    colored: bool,
    verbose: bool,
}

impl DifferencePrinter {
    #[must_use]
    pub const fn new(colored: bool, verbose: bool) -> Self {
        Self { colored, verbose }
    }

    fn color_for(kind: DifferenceKind) -> &'static str {
        match kind {
            DifferenceKind::Added => "green",
            DifferenceKind::Removed => "red",
            DifferenceKind::Modified => "yellow",
        }
    }

    /// Render the list; an empty list renders the "no differences" line.
    #[must_use]
    pub fn render(&self, differences: &[Difference]) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_into(&mut out, differences);
        out
    }

    fn render_into(&self, out: &mut String, differences: &[Difference]) -> std::fmt::Result {
        if differences.is_empty() {
            let line = "✓ No differences found - infrastructure state matches baseline";
            writeln!(out, "{}", ansi_color(line, "green", self.colored))?;
            return Ok(());
        }

        let header = format!("⚠ Found {} differences:", differences.len());
        writeln!(out, "{}", ansi_color(&header, "yellow", self.colored))?;

        for diff in differences {
            let line = format!(
                "{} {} {}: {} {}",
                diff.kind.symbol(),
                diff.kind.label(),
                diff.resource_type,
                diff.resource_id,
                diff.summary
            );
            writeln!(
                out,
                "{}",
                ansi_color(&line, Self::color_for(diff.kind), self.colored)
            )?;

            if self.verbose {
                for detail in &diff.details {
                    writeln!(out, "    {detail}")?;
                }
            }
        }
        Ok(())
    }

    /// Render straight into a writer
    pub fn write(&self, differences: &[Difference], writer: &mut dyn io::Write) -> io::Result<()> {
        writer.write_all(self.render(differences).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ResourceType;

    fn sample() -> Vec<Difference> {
        vec![
            Difference::added(ResourceType::Vpc, "vpc-new"),
            Difference::removed(ResourceType::Subnet, "subnet-old"),
            Difference::modified(
                ResourceType::SecurityGroup,
                "sg-1",
                vec!["description: allow web → allow ssh".to_string()],
            ),
        ]
    }

    #[test]
    fn test_empty_list() {
        let out = DifferencePrinter::new(false, false).render(&[]);
        assert_eq!(
            out,
            "✓ No differences found - infrastructure state matches baseline\n"
        );
    }

    #[test]
    fn test_plain_listing() {
        let out = DifferencePrinter::new(false, false).render(&sample());
        insta::assert_snapshot!(out, @r"
        ⚠ Found 3 differences:
        + ADDED VPC: vpc-new New vpc created
        - REMOVED Subnet: subnet-old subnet was deleted
        ~ MODIFIED SecurityGroup: sg-1 securitygroup configuration changed
        ");
    }

    #[test]
    fn test_verbose_details_indented() {
        let out = DifferencePrinter::new(false, true).render(&sample());
        assert!(out.contains("\n    description: allow web → allow ssh\n"));
    }

    #[test]
    fn test_colored_lines() {
        let out = DifferencePrinter::new(true, false).render(&sample());
        assert!(out.contains("\x1b[32m+ ADDED VPC: vpc-new"));
        assert!(out.contains("\x1b[31m- REMOVED Subnet"));
        assert!(out.contains("\x1b[33m~ MODIFIED SecurityGroup"));
    }
}
