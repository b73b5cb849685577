//! The Verified Answer Mode orchestrator.
//!
//! [`VamOrchestrator::process_question`] drives one question through the
//! pipeline states: cached answer, canonical solution, retrieval-grounded
//! generation, corrective decoding, and finally abstention. Every candidate
//! answer is verified and postprocessed before it can settle; a response is
//! marked verified only when its trust score clears the configured
//! threshold. No error ever escapes `process_question`.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use coach_canonical::{format_steps, CanonicalMatcher, CanonicalResult, MatchOptions};
use coach_core::{
    detect_variant, CoachError, CoachResponse, ExamVariant, ResponseMetadata, Result, Source,
    TrustScore,
};
use coach_model::{CompletionAdapter, CompletionOptions};
use coach_rag::{HybridRetriever, RetrievalOptions, SearchResult};
use coach_rubric::{postprocess, PostprocessResult, RubricConfig};
use coach_verify::trust::{calculate_trust_score, is_reliable};
use coach_verify::{VerificationClient, VerifierResponse, VerifyOptions};

use crate::cache::{cache_key, BoundedCache, FifoCache};
use crate::config::VamConfig;
use crate::state::{next_state, StageOutcome, VamState};

const SYSTEM_PROMPT: &str = "You are a calculus coach. Answer with numbered steps \
    (Step 1:, Step 2:, ...), name the rule or theorem each step uses, include units \
    where they apply, and state the final answer on its own line.";

/// Study tips used to pad abstention suggestions and failure responses.
const GENERAL_SUGGESTIONS: &[&str] = &[
    "Restate the question in your own words and identify which calculus concept it tests.",
    "Work a similar solved example from your textbook before retrying this problem.",
    "Check each step against the named rule or theorem it relies on.",
];

/// Caller-supplied context for a question.
#[derive(Debug, Clone, Default)]
pub struct QuestionContext {
    /// Explicit exam variant; detected from the question text when absent.
    pub variant: Option<ExamVariant>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Option<String>,
}

/// One assessed candidate answer.
struct Assessment {
    verification: VerifierResponse,
    post: PostprocessResult,
    trust: TrustScore,
}

/// A rejected candidate carried into the corrective pass.
struct Candidate {
    answer: String,
    sources: Vec<Source>,
}

/// Drives questions through the Verified Answer Mode pipeline.
pub struct VamOrchestrator {
    config: VamConfig,
    rubric: RubricConfig,
    matcher: CanonicalMatcher,
    retriever: HybridRetriever,
    adapter: CompletionAdapter,
    verifier: VerificationClient,
    cache: Arc<dyn BoundedCache>,
    model: String,
}

impl VamOrchestrator {
    /// Create an orchestrator over its collaborators, with a FIFO cache
    /// sized from the config and the default rubric.
    pub fn new(
        config: VamConfig,
        matcher: CanonicalMatcher,
        retriever: HybridRetriever,
        adapter: CompletionAdapter,
        verifier: VerificationClient,
        model: impl Into<String>,
    ) -> Self {
        let cache = Arc::new(FifoCache::new(config.cache.capacity));
        Self {
            config,
            rubric: RubricConfig::default(),
            matcher,
            retriever,
            adapter,
            verifier,
            cache,
            model: model.into(),
        }
    }

    /// Replace the answer cache.
    pub fn with_cache(mut self, cache: Arc<dyn BoundedCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the rubric configuration.
    pub fn with_rubric(mut self, rubric: RubricConfig) -> Self {
        self.rubric = rubric;
        self
    }

    /// Answer a question; never errors.
    ///
    /// Any unhandled pipeline failure is caught here and converted into an
    /// unverified response with generic study suggestions.
    pub async fn process_question(
        &self,
        question: &str,
        context: &QuestionContext,
    ) -> CoachResponse {
        let variant = context.variant.unwrap_or_else(|| {
            let (detected, confidence, _) = detect_variant(question);
            debug!(variant = %detected, confidence, "exam variant detected");
            detected
        });

        let key =
            cache_key(variant, question, context.topic.as_deref(), context.subtopic.as_deref());
        if let Some(cached) = self.cache.get(&key).await {
            info!(variant = %variant, "answer served from cache");
            return cached;
        }

        let response = match self.run(question, variant, context).await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "pipeline failed, returning unverified fallback");
                self.failure_response(variant, context)
            }
        };

        if response.verified || !self.config.cache.verified_only {
            self.cache.insert(key, response.clone()).await;
        }
        response
    }

    /// The pipeline state machine.
    async fn run(
        &self,
        question: &str,
        variant: ExamVariant,
        context: &QuestionContext,
    ) -> Result<CoachResponse> {
        let mut state = VamState::initial(self.config.canonical_first);
        let mut retry_count: u32 = 0;
        let mut retrieval: Vec<SearchResult> = Vec::new();
        let mut candidate: Option<Candidate> = None;
        let mut settled: Option<CoachResponse> = None;

        while state != VamState::Done {
            let outcome = match state {
                VamState::CanonicalFirst => {
                    match self.try_canonical(question, variant, context).await {
                        Ok(Some(response)) => {
                            settled = Some(response);
                            StageOutcome::Accepted
                        }
                        Ok(None) => StageOutcome::Rejected,
                        Err(err) => {
                            warn!(error = %err, "canonical stage failed, falling through");
                            StageOutcome::Rejected
                        }
                    }
                }
                VamState::RetrievalGeneration => {
                    retrieval = self.retrieve(question, variant, context).await?;
                    let answer = self.generate(question, &retrieval, None).await?;
                    let assessment = self.assess(question, variant, &answer).await;
                    let sources = self.generation_sources(&retrieval);
                    if self.accepted(&assessment) {
                        settled = Some(self.build_response(
                            variant,
                            context,
                            assessment,
                            sources,
                            retry_count,
                        ));
                        StageOutcome::Accepted
                    } else {
                        candidate = Some(Candidate { answer, sources });
                        if self.config.max_retries == 0 {
                            StageOutcome::Exhausted
                        } else {
                            StageOutcome::Rejected
                        }
                    }
                }
                VamState::CorrectiveDecode => {
                    let prior = candidate.take().ok_or_else(|| {
                        CoachError::Validation(
                            "corrective decode entered without a candidate".into(),
                        )
                    })?;
                    let answer = self.generate(question, &retrieval, Some(&prior)).await?;
                    retry_count += 1;
                    let assessment = self.assess(question, variant, &answer).await;
                    let sources = self.generation_sources(&retrieval);
                    if self.accepted(&assessment) {
                        settled = Some(self.build_response(
                            variant,
                            context,
                            assessment,
                            sources,
                            retry_count,
                        ));
                        StageOutcome::Accepted
                    } else {
                        candidate = Some(Candidate { answer, sources });
                        if retry_count >= self.config.max_retries {
                            StageOutcome::Exhausted
                        } else {
                            StageOutcome::Rejected
                        }
                    }
                }
                VamState::Abstain => {
                    settled =
                        Some(self.abstain_response(variant, context, &retrieval, retry_count));
                    StageOutcome::Rejected
                }
                VamState::Done => break,
            };
            state = next_state(state, outcome);
        }

        settled.ok_or_else(|| {
            CoachError::Validation("pipeline reached Done without a settled response".into())
        })
    }

    /// Canonical-first stage: match, render, verify, postprocess.
    async fn try_canonical(
        &self,
        question: &str,
        variant: ExamVariant,
        context: &QuestionContext,
    ) -> Result<Option<CoachResponse>> {
        let mut options = MatchOptions::new(variant);
        options.topic = context.topic.clone();
        options.subtopic = context.subtopic.clone();
        options.difficulty = context.difficulty.clone();

        let Some(result) = self.matcher.find_best(question, &options).await? else {
            debug!("no canonical solution matched");
            return Ok(None);
        };

        let answer = render_canonical_answer(&result);
        let assessment = self.assess(question, variant, &answer).await;
        if !self.accepted(&assessment) {
            info!(
                solution_id = %result.solution.id,
                trust = assessment.trust.score,
                "canonical candidate did not clear the trust threshold"
            );
            return Ok(None);
        }

        let sources = vec![Source::Canonical {
            id: result.solution.id.clone(),
            title: Some(result.solution.question_template.clone()),
            snippet: Some(result.solution.final_answer.clone()),
            score: Some(result.score),
        }];
        Ok(Some(self.build_response(variant, context, assessment, sources, 0)))
    }

    /// Retrieve grounding documents for the question.
    async fn retrieve(
        &self,
        question: &str,
        variant: ExamVariant,
        context: &QuestionContext,
    ) -> Result<Vec<SearchResult>> {
        let mut builder = RetrievalOptions::builder(variant);
        if let Some(topic) = &context.topic {
            builder = builder.topic(topic.clone());
        }
        if let Some(subtopic) = &context.subtopic {
            builder = builder.subtopic(subtopic.clone());
        }
        let options = builder.build()?;
        Ok(self.retriever.search(question, &options).await?)
    }

    /// Generate an answer, optionally as a corrective pass over a prior
    /// candidate.
    async fn generate(
        &self,
        question: &str,
        retrieval: &[SearchResult],
        prior: Option<&Candidate>,
    ) -> Result<String> {
        let mut content = format!("Question: {question}\n");
        if !retrieval.is_empty() {
            content.push_str("\nReference material:\n");
            for (i, result) in retrieval.iter().enumerate() {
                content.push_str(&format!(
                    "{}. {}: {}\n",
                    i + 1,
                    result.document.title,
                    result.snippet
                ));
            }
        }
        if let Some(prior) = prior {
            content.push_str("\nYour previous answer failed verification:\n");
            content.push_str(&prior.answer);
            let titles: Vec<&str> = prior.sources.iter().filter_map(Source::title).collect();
            if !titles.is_empty() {
                content.push_str(&format!("\nSources consulted: {}\n", titles.join("; ")));
            }
            content.push_str(
                "\nRevise the solution, correcting any mathematical errors, and show every step.",
            );
        }

        let mut options = CompletionOptions::prompt(&self.model, content);
        options.system = Some(SYSTEM_PROMPT.to_string());
        if prior.is_some() {
            options.temperature = self.config.corrective_temperature;
        }

        let result = self.adapter.complete_with_retry(&options).await?;
        Ok(result.text)
    }

    /// Verify, postprocess, and trust-score one candidate answer.
    async fn assess(&self, question: &str, variant: ExamVariant, answer: &str) -> Assessment {
        let verification =
            self.verifier.verify(question, answer, &VerifyOptions::default()).await;
        let post = postprocess(answer, variant, &self.rubric);
        let trust = calculate_trust_score(&verification, answer);
        debug!(
            trust = trust.score,
            rubric = post.score,
            ok = verification.ok,
            check_count = verification.checks.len(),
            "candidate assessed"
        );
        Assessment { verification, post, trust }
    }

    /// The acceptance gate: the verifier judged the answer correct, the
    /// judgment itself is reliable, and trust clears the threshold.
    fn accepted(&self, assessment: &Assessment) -> bool {
        assessment.verification.ok
            && is_reliable(&assessment.verification)
            && assessment.trust.score >= self.config.trust_threshold
    }

    fn retrieval_sources(&self, retrieval: &[SearchResult]) -> Vec<Source> {
        retrieval
            .iter()
            .map(|result| Source::Retrieval {
                id: result.document.id.clone(),
                title: Some(result.document.title.clone()),
                snippet: Some(result.snippet.clone()),
                score: Some(result.score),
            })
            .collect()
    }

    fn generation_sources(&self, retrieval: &[SearchResult]) -> Vec<Source> {
        let mut sources = self.retrieval_sources(retrieval);
        sources.push(Source::Generated {
            id: self.model.clone(),
            title: None,
            snippet: None,
            score: None,
        });
        sources
    }

    fn build_response(
        &self,
        variant: ExamVariant,
        context: &QuestionContext,
        assessment: Assessment,
        sources: Vec<Source>,
        retry_count: u32,
    ) -> CoachResponse {
        let confidence = assessment.trust.confidence;
        CoachResponse {
            answer: assessment.post.content,
            verified: true,
            trust_score: assessment.trust,
            confidence,
            sources,
            suggestions: Vec::new(),
            metadata: self.metadata(variant, context, retry_count),
        }
    }

    /// The abstention response: no verified answer, study suggestions drawn
    /// from retrieval and padded with generic tips.
    fn abstain_response(
        &self,
        variant: ExamVariant,
        context: &QuestionContext,
        retrieval: &[SearchResult],
        retry_count: u32,
    ) -> CoachResponse {
        let mut suggestions: Vec<String> = retrieval
            .iter()
            .take(self.config.max_suggestions)
            .map(|result| format!("Review {}: {}", result.document.title, result.snippet))
            .collect();
        for tip in GENERAL_SUGGESTIONS {
            if suggestions.len() >= self.config.max_suggestions {
                break;
            }
            suggestions.push((*tip).to_string());
        }

        info!(suggestion_count = suggestions.len(), "abstaining from an unverified answer");
        CoachResponse {
            answer: "I could not produce an answer that passes verification for this \
                     question, so I won't guess. The suggestions below may help you work \
                     it through."
                .to_string(),
            verified: false,
            trust_score: TrustScore::zero(),
            confidence: 0.0,
            sources: self.retrieval_sources(retrieval),
            suggestions,
            metadata: self.metadata(variant, context, retry_count),
        }
    }

    /// The boundary fallback when the pipeline itself fails.
    fn failure_response(&self, variant: ExamVariant, context: &QuestionContext) -> CoachResponse {
        let suggestions = GENERAL_SUGGESTIONS
            .iter()
            .take(self.config.max_suggestions.max(1))
            .map(|tip| (*tip).to_string())
            .collect();
        CoachResponse {
            answer: "Something went wrong while answering this question, so no verified \
                     answer is available. Please try again."
                .to_string(),
            verified: false,
            trust_score: TrustScore::zero(),
            confidence: 0.0,
            sources: Vec::new(),
            suggestions,
            metadata: self.metadata(variant, context, 0),
        }
    }

    fn metadata(
        &self,
        variant: ExamVariant,
        context: &QuestionContext,
        retry_count: u32,
    ) -> ResponseMetadata {
        ResponseMetadata {
            exam_variant: variant,
            topic: context.topic.clone(),
            subtopic: context.subtopic.clone(),
            difficulty: context.difficulty.clone(),
            retry_count,
        }
    }
}

/// Render a matched canonical solution as step-structured answer text.
fn render_canonical_answer(result: &CanonicalResult) -> String {
    let steps = format_steps(&result.solution);
    let mut answer = String::new();
    for step in &steps {
        answer.push_str(&format!("Step {}: {}\n{}\n", step.index, step.description, step.work));
    }
    answer.push_str(&format!("Final answer: {}", result.solution.final_answer));
    answer
}
