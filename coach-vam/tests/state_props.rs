//! Property tests for the pipeline state machine and the answer cache.

use proptest::prelude::*;

use coach_core::{CoachResponse, ExamVariant, ResponseMetadata, TrustScore};
use coach_vam::{cache_key, next_state, BoundedCache, FifoCache, StageOutcome, VamState};

fn states() -> impl Strategy<Value = VamState> {
    prop_oneof![
        Just(VamState::CanonicalFirst),
        Just(VamState::RetrievalGeneration),
        Just(VamState::CorrectiveDecode),
        Just(VamState::Abstain),
        Just(VamState::Done),
    ]
}

fn outcomes() -> impl Strategy<Value = StageOutcome> {
    prop_oneof![
        Just(StageOutcome::Accepted),
        Just(StageOutcome::Rejected),
        Just(StageOutcome::Exhausted),
    ]
}

fn response() -> CoachResponse {
    CoachResponse {
        answer: "2x".into(),
        verified: true,
        trust_score: TrustScore::zero(),
        confidence: 0.0,
        sources: Vec::new(),
        suggestions: Vec::new(),
        metadata: ResponseMetadata {
            exam_variant: ExamVariant::CalcAb,
            topic: None,
            subtopic: None,
            difficulty: None,
            retry_count: 0,
        },
    }
}

mod prop_state_machine {
    use super::*;

    proptest! {
        #[test]
        fn acceptance_always_settles(state in states()) {
            prop_assert_eq!(next_state(state, StageOutcome::Accepted), VamState::Done);
        }

        #[test]
        fn done_is_absorbing(outcome in outcomes()) {
            prop_assert_eq!(next_state(VamState::Done, outcome), VamState::Done);
        }

        #[test]
        fn exhaustion_abstains_then_settles(
            state in prop_oneof![
                Just(VamState::RetrievalGeneration),
                Just(VamState::CorrectiveDecode),
            ],
            outcome in outcomes(),
        ) {
            let next = next_state(state, StageOutcome::Exhausted);
            prop_assert_eq!(next, VamState::Abstain);
            prop_assert_eq!(next_state(next, outcome), VamState::Done);
        }
    }
}

mod prop_cache {
    use super::*;

    proptest! {
        #[test]
        fn capacity_is_never_exceeded(
            capacity in 1usize..8,
            keys in proptest::collection::vec("[a-c]{1,2}", 0..40),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let cache = FifoCache::new(capacity);
                for key in keys {
                    cache.insert(key, response()).await;
                    assert!(cache.len().await <= capacity);
                }
            });
        }

        #[test]
        fn key_is_deterministic(question in "\\PC{0,40}", topic in proptest::option::of("[a-z]{1,8}")) {
            let a = cache_key(ExamVariant::CalcBc, &question, topic.as_deref(), None);
            let b = cache_key(ExamVariant::CalcBc, &question, topic.as_deref(), None);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), 64);
        }
    }
}
