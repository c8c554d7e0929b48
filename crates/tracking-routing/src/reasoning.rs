//! Human-readable explanations of routing decisions.

use tracking_core::{Carrier, TrackingContext};

const CLAUSE_SEPARATOR: &str = ". ";

/// Renders a deterministic explanation for a decision
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningGenerator;

impl ReasoningGenerator {
    /// Create a generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Explain a decision.
    ///
    /// `suggested` is the carrier offered to the caller with its detection
    /// confidence; `top_choice` is the first prioritized provider.
    #[must_use]
    pub fn generate(
        &self,
        context: &TrackingContext,
        suggested: Option<(Carrier, f64)>,
        top_choice: &str,
    ) -> String {
        let mut clauses: Vec<String> = Vec::with_capacity(5);

        if let Some((carrier, confidence)) = suggested {
            clauses.push(format!(
                "Detected {} tracking number ({:.0}% confidence), carrier id {}",
                carrier.shouting_name(),
                confidence * 100.0,
                carrier.id()
            ));
        }

        if context.cost_optimization {
            clauses.push("Prioritizing cost-effective providers".to_string());
        }

        if context.reliability_optimization {
            clauses.push("Prioritizing reliability over cost".to_string());
        }

        if !context.previous_failures.is_empty() {
            let failed: Vec<&str> = context.previous_failures.iter().map(String::as_str).collect();
            clauses.push(format!("Deprioritizing failed providers: {}", failed.join(", ")));
        }

        clauses.push(format!("Top choice: {top_choice}"));
        clauses.join(CLAUSE_SEPARATOR)
    }
}
