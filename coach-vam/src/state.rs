//! The Verified Answer Mode pipeline as a finite-state machine.

use serde::{Deserialize, Serialize};

/// The stages a question moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VamState {
    /// Try a pre-authored canonical solution first.
    CanonicalFirst,
    /// Retrieve context and generate an answer with the completion model.
    RetrievalGeneration,
    /// Re-prompt at reduced temperature with the prior answer and sources.
    CorrectiveDecode,
    /// Give up on a verified answer and return study suggestions.
    Abstain,
    /// A response has been settled.
    Done,
}

impl VamState {
    /// The starting state for a fresh question.
    pub fn initial(canonical_first: bool) -> Self {
        if canonical_first { VamState::CanonicalFirst } else { VamState::RetrievalGeneration }
    }
}

/// How a pipeline stage concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage produced an answer that met the trust threshold.
    Accepted,
    /// The stage produced nothing acceptable; move to the next strategy.
    Rejected,
    /// Corrective retries are used up.
    Exhausted,
}

/// The pure transition function of the pipeline.
///
/// `Done` is terminal. A rejected corrective pass stays in
/// `CorrectiveDecode` until the caller reports `Exhausted`.
pub fn next_state(state: VamState, outcome: StageOutcome) -> VamState {
    use StageOutcome::*;
    use VamState::*;
    match (state, outcome) {
        (Done, _) => Done,
        (_, Accepted) => Done,
        (CanonicalFirst, _) => RetrievalGeneration,
        (RetrievalGeneration, Exhausted) => Abstain,
        (RetrievalGeneration, Rejected) => CorrectiveDecode,
        (CorrectiveDecode, Rejected) => CorrectiveDecode,
        (CorrectiveDecode, Exhausted) => Abstain,
        (Abstain, _) => Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_honors_canonical_first() {
        assert_eq!(VamState::initial(true), VamState::CanonicalFirst);
        assert_eq!(VamState::initial(false), VamState::RetrievalGeneration);
    }

    #[test]
    fn acceptance_is_terminal_from_every_state() {
        for state in [
            VamState::CanonicalFirst,
            VamState::RetrievalGeneration,
            VamState::CorrectiveDecode,
            VamState::Abstain,
            VamState::Done,
        ] {
            assert_eq!(next_state(state, StageOutcome::Accepted), VamState::Done);
        }
    }

    #[test]
    fn rejection_walks_the_pipeline_in_order() {
        let s = next_state(VamState::CanonicalFirst, StageOutcome::Rejected);
        assert_eq!(s, VamState::RetrievalGeneration);
        let s = next_state(s, StageOutcome::Rejected);
        assert_eq!(s, VamState::CorrectiveDecode);
        let s = next_state(s, StageOutcome::Exhausted);
        assert_eq!(s, VamState::Abstain);
        let s = next_state(s, StageOutcome::Rejected);
        assert_eq!(s, VamState::Done);
    }

    #[test]
    fn corrective_decode_loops_until_exhausted() {
        let s = next_state(VamState::CorrectiveDecode, StageOutcome::Rejected);
        assert_eq!(s, VamState::CorrectiveDecode);
        assert_eq!(next_state(s, StageOutcome::Exhausted), VamState::Abstain);
    }

    #[test]
    fn done_is_terminal() {
        for outcome in [StageOutcome::Accepted, StageOutcome::Rejected, StageOutcome::Exhausted] {
            assert_eq!(next_state(VamState::Done, outcome), VamState::Done);
        }
    }

    #[test]
    fn zero_retry_budget_skips_corrective_decode() {
        assert_eq!(
            next_state(VamState::RetrievalGeneration, StageOutcome::Exhausted),
            VamState::Abstain
        );
    }
}
