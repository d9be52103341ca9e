//! Fixed-column MPS text export.

use std::time::Instant;

use matforge_expr::{ComparisonKind, Storage};

use crate::model::error::FormatError;
use crate::model::Model;

/// Longest variable or row name the fixed columns can hold.
pub const NAME_WIDTH: usize = 9;

const OBJECTIVE_ROW: &str = "COST";

fn field(name: &str) -> String {
    format!("{name:<width$}", width = NAME_WIDTH + 1)
}

fn check_name(name: &str) -> Result<(), FormatError> {
    if name.chars().count() > NAME_WIDTH {
        return Err(FormatError::NameTooLong {
            name: name.to_string(),
            limit: NAME_WIDTH,
        });
    }
    Ok(())
}

impl<S: Storage> Model<S> {
    /// Render the model in fixed-column MPS format.
    ///
    /// Only rows with at least one nonzero coefficient are written, and only
    /// nonzero `(variable, row)` pairs produce COLUMNS entries. Any name wider
    /// than [`NAME_WIDTH`] aborts the whole document.
    pub fn to_mps(&self, name: &str) -> Result<String, FormatError> {
        let started = Instant::now();
        for var in &self.variables {
            check_name(&var.name)?;
        }

        let mut lines = vec![format!("NAME          {name}"), "ROWS".to_string()];
        let has_objective = !self.objective.is_zero();
        if has_objective {
            lines.push(format!(" N   {OBJECTIVE_ROW}"));
        }

        let mut rows = Vec::new();
        for (constraint_name, constraint) in self.constraints() {
            if constraint.is_trivial() {
                continue;
            }
            check_name(constraint_name)?;
            let (kind, rhs) = constraint.non_strict().ok_or_else(|| {
                FormatError::UnsupportedComparison {
                    constraint: constraint_name.to_string(),
                    kind: constraint.kind(),
                }
            })?;
            let marker = match kind {
                ComparisonKind::Equal => "E",
                ComparisonKind::GreaterEqual => "G",
                _ => "L",
            };
            lines.push(format!(" {marker}   {constraint_name}"));
            rows.push((constraint_name, constraint, rhs));
        }

        // Transpose rows into per-variable columns, objective entry first.
        let mut columns: Vec<Vec<(&str, i64)>> = vec![Vec::new(); self.variables.len()];
        if has_objective {
            for (var_id, coeff) in self.objective.terms() {
                if let Some(column) = columns.get_mut(var_id.index()) {
                    column.push((OBJECTIVE_ROW, coeff));
                }
            }
        }
        for (constraint_name, constraint, _) in &rows {
            for (var_id, coeff) in constraint.terms() {
                if let Some(column) = columns.get_mut(var_id.index()) {
                    column.push((*constraint_name, coeff));
                }
            }
        }

        lines.push("COLUMNS".to_string());
        lines.push("    MARK0000  'MARKER'  'INTORG'".to_string());
        let mut entries = 0usize;
        for (var, column) in self.variables.iter().zip(&columns) {
            let begin = format!("    {}", field(&var.name));
            for (row_name, coeff) in column {
                lines.push(format!("{begin}{}{coeff}", field(row_name)));
                entries += 1;
            }
        }
        lines.push("    MARK0000  'MARKER'  'INTEND'".to_string());

        lines.push("RHS".to_string());
        for (constraint_name, _, rhs) in &rows {
            lines.push(format!("    RHS1      {}{rhs}", field(constraint_name)));
        }

        // Variables that never appear in COLUMNS are unknown to readers.
        let bounded: Vec<_> = self
            .variables
            .iter()
            .zip(&columns)
            .filter(|(_, column)| !column.is_empty())
            .map(|(var, _)| var)
            .collect();
        if !bounded.is_empty() {
            lines.push("BOUNDS".to_string());
            for var in bounded {
                if var.bounds.lower != 0 {
                    lines.push(format!(" LO BND1      {}{}", field(&var.name), var.bounds.lower));
                }
                lines.push(format!(" UP BND1      {}{}", field(&var.name), var.bounds.upper));
            }
        }

        lines.push("ENDATA".to_string());

        tracing::debug!(
            component = "model",
            operation = "export_mps",
            status = "success",
            rows = rows.len(),
            entries,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Rendered MPS document"
        );
        Ok(lines.join("\n"))
    }
}
