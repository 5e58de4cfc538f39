//! Shared CLI utilities.

use console::style;

use crate::config::{SourceOutcome, SourceStatus};

/// Print one line of the config search report.
pub fn print_outcome(outcome: &SourceOutcome) {
    let label = outcome.kind.label();
    let path = outcome.path.display();
    match &outcome.status {
        SourceStatus::Loaded(tables) => {
            let tables = if tables.is_empty() {
                label.to_string()
            } else {
                tables.join("', '")
            };
            println!("  {} '{}' from {}", style("Loaded").green(), tables, path);
        }
        SourceStatus::NotFound => {
            println!("  No '{}' file at {}, continuing...", label, style(path).dim());
        }
        SourceStatus::Shadowed => {
            println!("  Skipping {}, '{}' was provided by config", path, label);
        }
        SourceStatus::Skipped(e) => {
            eprintln!("  {} {}", style("Ignoring").yellow(), e);
        }
    }
}

/// Join items for display, or `(none)` when empty.
pub fn list_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_or_none_joins_items() {
        assert_eq!(list_or_none::<&str>(&[]), "(none)");
        assert_eq!(list_or_none(&["a", "b"]), "a, b");
    }
}
