//! CPLEX-LP text export.

use std::time::Instant;

use matforge_expr::{Storage, VariableId};

use crate::model::error::FormatError;
use crate::model::Model;

impl<S: Storage> Model<S> {
    /// Render the model in LP format.
    ///
    /// Layout: `Minimize`, `Subject To`, `Bounds`, `Generals`, `End`. Two
    /// additions to the bare layout: a non-empty `name` becomes a leading
    /// `\ name` comment line, and `Bounds` carries every variable domain so the
    /// document alone reproduces `0 <= x <= q - 1`.
    ///
    /// Rows without any nonzero coefficient are skipped. Strict comparisons
    /// are written in their tightened non-strict form; `!=` rows are rejected.
    pub fn to_lp(&self, name: &str) -> Result<String, FormatError> {
        let started = Instant::now();
        let mut lines = Vec::new();
        if !name.is_empty() {
            lines.push(format!("\\ {name}"));
        }
        lines.push("Minimize".to_string());
        lines.push(format!(" {}", self.format_terms(&self.objective.terms())));
        lines.push("Subject To".to_string());

        let mut rows = 0usize;
        for (constraint_name, constraint) in self.constraints() {
            if constraint.is_trivial() {
                continue;
            }
            let (kind, rhs) = constraint.non_strict().ok_or_else(|| {
                FormatError::UnsupportedComparison {
                    constraint: constraint_name.to_string(),
                    kind: constraint.kind(),
                }
            })?;
            lines.push(format!(
                " {constraint_name}: {} {} {rhs}",
                self.format_terms(&constraint.terms()),
                kind.symbol()
            ));
            rows += 1;
        }

        if !self.variables.is_empty() {
            lines.push("Bounds".to_string());
            for var in &self.variables {
                lines.push(format!(
                    " {} <= {} <= {}",
                    var.bounds.lower, var.name, var.bounds.upper
                ));
            }
        }

        lines.push("Generals".to_string());
        let names: Vec<&str> = self.variables.iter().map(|var| var.name.as_str()).collect();
        lines.push(format!(" {}", names.join(" ")));
        lines.push("End".to_string());

        tracing::debug!(
            component = "model",
            operation = "export_lp",
            status = "success",
            rows,
            variables = self.variables.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Rendered LP document"
        );
        Ok(lines.join("\n"))
    }

    fn format_terms(&self, terms: &[(VariableId, i64)]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        let mut rendered = String::new();
        for (idx, (var_id, coeff)) in terms.iter().enumerate() {
            let label = self.variable_name(*var_id).unwrap_or("?");
            let sign = match (idx == 0, *coeff < 0) {
                (true, true) => "-",
                (true, false) => "",
                (false, true) => " - ",
                (false, false) => " + ",
            };
            rendered.push_str(sign);
            rendered.push_str(&format!("{} {label}", coeff.unsigned_abs()));
        }
        rendered
    }
}
