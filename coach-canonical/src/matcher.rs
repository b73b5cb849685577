//! Best-canonical matching: per-query relevance and quality scoring.

use std::sync::Arc;

use tracing::{debug, info};

use coach_core::{ExamVariant, Result};

use crate::solution::{CanonicalFilter, CanonicalMetadata, CanonicalResult, CanonicalSolution};
use crate::store::CanonicalStore;

/// Relevance contribution when the full query appears in the content.
const FULL_QUERY_WEIGHT: f64 = 0.5;
/// Maximum relevance contribution from per-word coverage.
const WORD_COVERAGE_WEIGHT: f64 = 0.3;
/// Relevance contribution for an exact variant match.
const EXACT_VARIANT_WEIGHT: f64 = 0.2;
/// Relevance contribution for a variant-agnostic record.
const AGNOSTIC_VARIANT_WEIGHT: f64 = 0.1;

/// Options for [`CanonicalMatcher::find_best`].
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// The exam variant the query was asked under.
    pub variant: ExamVariant,
    /// Candidates scoring below this are discarded.
    pub min_score: f64,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Option<String>,
}

impl MatchOptions {
    /// Options with the default minimum score (0.3) for a variant.
    pub fn new(variant: ExamVariant) -> Self {
        Self { variant, min_score: 0.3, topic: None, subtopic: None, difficulty: None }
    }
}

/// Finds the best pre-authored reference solution for a query.
pub struct CanonicalMatcher {
    store: Arc<dyn CanonicalStore>,
}

impl CanonicalMatcher {
    /// Create a matcher over the given store.
    pub fn new(store: Arc<dyn CanonicalStore>) -> Self {
        Self { store }
    }

    /// Find the best canonical solution for a query, or `None` when nothing
    /// clears `options.min_score`.
    ///
    /// Candidates are fetched filtered by variant (exact or agnostic),
    /// topic, subtopic, and difficulty; survivors are ordered by relevance
    /// descending.
    ///
    /// # Errors
    ///
    /// Store failures propagate; the orchestrator degrades gracefully.
    pub async fn find_best(
        &self,
        query: &str,
        options: &MatchOptions,
    ) -> Result<Option<CanonicalResult>> {
        let filter = CanonicalFilter {
            exam_variant: Some(options.variant),
            topic: options.topic.clone(),
            subtopic: options.subtopic.clone(),
            difficulty: options.difficulty.clone(),
        };
        let candidates = self.store.select(&filter).await?;
        debug!(candidate_count = candidates.len(), "canonical candidates fetched");

        let mut scored: Vec<CanonicalResult> = candidates
            .into_iter()
            .filter_map(|solution| {
                let relevance = relevance(query, &solution, options.variant);
                let score = relevance * quality_multiplier(&solution);
                if score < options.min_score {
                    return None;
                }
                let metadata = CanonicalMetadata {
                    topic: solution.topic.clone(),
                    subtopic: solution.subtopic.clone(),
                    difficulty: solution.difficulty.clone(),
                    exam_variant: solution.exam_variant,
                };
                Some(CanonicalResult { solution, score, relevance, metadata })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.relevance.partial_cmp(&a.relevance).unwrap_or(std::cmp::Ordering::Equal)
        });

        let best = scored.into_iter().next();
        if let Some(result) = &best {
            info!(
                solution_id = %result.solution.id,
                relevance = result.relevance,
                score = result.score,
                "canonical match found"
            );
        }
        Ok(best)
    }
}

/// Query relevance in [0, 1].
///
/// 0.5 when the full lowercased query is a substring of the concatenated
/// template + answer text, plus up to 0.3 proportional to the fraction of
/// query words found, plus 0.2 for an exact variant match or 0.1 for a
/// variant-agnostic record.
pub fn relevance(query: &str, solution: &CanonicalSolution, variant: ExamVariant) -> f64 {
    let query_lower = query.to_lowercase();
    let content =
        format!("{} {}", solution.question_template, solution.final_answer).to_lowercase();

    let mut score = 0.0;
    if !query_lower.is_empty() && content.contains(&query_lower) {
        score += FULL_QUERY_WEIGHT;
    }

    let words: Vec<&str> = query_lower.split_whitespace().collect();
    if !words.is_empty() {
        let found = words.iter().filter(|word| content.contains(**word)).count();
        score += WORD_COVERAGE_WEIGHT * (found as f64 / words.len() as f64);
    }

    score += match solution.exam_variant {
        Some(v) if v == variant => EXACT_VARIANT_WEIGHT,
        None => AGNOSTIC_VARIANT_WEIGHT,
        Some(_) => 0.0,
    };

    score.clamp(0.0, 1.0)
}

/// Quality multiplier starting at 1.0, +0.1 for each of: more than 3 steps,
/// total step-work length over 200 characters, any step description
/// containing a causal connective.
pub fn quality_multiplier(solution: &CanonicalSolution) -> f64 {
    let mut multiplier = 1.0;
    if solution.steps.len() > 3 {
        multiplier += 0.1;
    }
    let work_len: usize = solution.steps.iter().map(|s| s.work.len()).sum();
    if work_len > 200 {
        multiplier += 0.1;
    }
    let has_causal = solution.steps.iter().any(|s| {
        let lower = s.description.to_lowercase();
        lower.contains("because") || lower.contains("since")
    });
    if has_causal {
        multiplier += 0.1;
    }
    multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::SolutionStep;
    use crate::store::InMemoryCanonicalStore;

    fn solution(id: &str, template: &str, variant: Option<ExamVariant>) -> CanonicalSolution {
        CanonicalSolution {
            id: id.into(),
            question_template: template.into(),
            final_answer: "2x".into(),
            steps: Vec::new(),
            exam_variant: variant,
            topic: None,
            subtopic: None,
            difficulty: None,
        }
    }

    #[test]
    fn full_substring_match_scores_high() {
        let sol = solution("s", "what is the derivative of x^2", Some(ExamVariant::CalcAb));
        let score = relevance("derivative of x^2", &sol, ExamVariant::CalcAb);
        // 0.5 substring + 0.3 full word coverage + 0.2 exact variant
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn variant_contribution_prefers_exact_over_agnostic() {
        let exact = solution("a", "derivative of x^2", Some(ExamVariant::CalcAb));
        let agnostic = solution("b", "derivative of x^2", None);
        let mismatch = solution("c", "derivative of x^2", Some(ExamVariant::CalcBc));

        let q = "derivative of x^2";
        let r_exact = relevance(q, &exact, ExamVariant::CalcAb);
        let r_agnostic = relevance(q, &agnostic, ExamVariant::CalcAb);
        let r_mismatch = relevance(q, &mismatch, ExamVariant::CalcAb);
        assert!(r_exact > r_agnostic);
        assert!(r_agnostic > r_mismatch);
    }

    #[test]
    fn quality_multiplier_counts_signals() {
        let mut sol = solution("s", "q", None);
        assert_eq!(quality_multiplier(&sol), 1.0);

        sol.steps = (0..4)
            .map(|i| SolutionStep {
                description: if i == 0 {
                    "Apply the rule because it fits".into()
                } else {
                    format!("step {i}")
                },
                work: "w".repeat(60),
                justification: None,
            })
            .collect();
        // >3 steps, >200 chars of work, causal connective
        assert!((quality_multiplier(&sol) - 1.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn find_best_returns_highest_relevance() {
        let store = Arc::new(InMemoryCanonicalStore::new());
        store.insert(solution("weak", "unrelated topic entirely", None)).await;
        store
            .insert(solution("strong", "what is the derivative of x^2", Some(ExamVariant::CalcAb)))
            .await;

        let matcher = CanonicalMatcher::new(store);
        let options = MatchOptions::new(ExamVariant::CalcAb);
        let best = matcher.find_best("derivative of x^2", &options).await.unwrap();
        assert_eq!(best.unwrap().solution.id, "strong");
    }

    #[tokio::test]
    async fn find_best_returns_none_below_min_score() {
        let store = Arc::new(InMemoryCanonicalStore::new());
        store.insert(solution("weak", "polar area sketching", None)).await;

        let matcher = CanonicalMatcher::new(store);
        let mut options = MatchOptions::new(ExamVariant::CalcAb);
        options.min_score = 0.5;
        let best = matcher.find_best("derivative of x^2", &options).await.unwrap();
        assert!(best.is_none());
    }

    #[tokio::test]
    async fn bc_records_are_filtered_out_for_ab_queries() {
        let store = Arc::new(InMemoryCanonicalStore::new());
        store
            .insert(solution("bc", "derivative of x^2", Some(ExamVariant::CalcBc)))
            .await;

        let matcher = CanonicalMatcher::new(store);
        let options = MatchOptions::new(ExamVariant::CalcAb);
        let best = matcher.find_best("derivative of x^2", &options).await.unwrap();
        assert!(best.is_none());
    }
}
