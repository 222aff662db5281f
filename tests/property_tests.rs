use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use std::time::Duration;

use tapwpm::clock::ManualClock;
use tapwpm::corpus::WordCorpus;
use tapwpm::metrics::{self, Metrics};
use tapwpm::session::{Keystroke, SessionState};

// --- STRATEGIES ---

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn arb_keystroke() -> impl Strategy<Value = Keystroke> {
    prop_oneof![
        6 => proptest::char::range('a', 'z').prop_map(Keystroke::Char),
        2 => Just(Keystroke::Space),
        2 => Just(Keystroke::Backspace),
        1 => Just(Keystroke::Char('!')),
    ]
}

proptest! {
    #[test]
    fn sample_returns_n_corpus_words(
        words in proptest::collection::vec(arb_word(), 1..30),
        n in 0usize..100,
        seed in any::<u64>(),
    ) {
        let corpus = WordCorpus::new("prop", words).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);

        let sampled = corpus.sample(n, &mut rng);

        prop_assert_eq!(sampled.len(), n);
        prop_assert!(sampled.iter().all(|w| corpus.words().contains(w)));
    }

    #[test]
    fn reachable_states_keep_invariants(
        words in proptest::collection::vec(arb_word(), 1..6),
        keys in proptest::collection::vec(arb_keystroke(), 0..80),
    ) {
        let clock = ManualClock::default();
        let mut state = SessionState::new(words);
        let total_words = state.total_words();

        for key in keys {
            let next = state.apply(key, &clock);
            clock.advance(Duration::from_millis(150));

            prop_assert_eq!(next.annotations().len(), next.text().len());
            prop_assert!(next.cursor() <= next.text().len() - 1);
            prop_assert!(next.current_word_index() <= total_words);
            prop_assert!(next.keystroke_count() >= state.keystroke_count());
            prop_assert!(next.mistake_count() >= state.mistake_count());
            prop_assert!(next.mistake_count() <= next.keystroke_count());

            let m = Metrics::compute(&next, &clock);
            prop_assert!(m.accuracy <= 100);

            if state.has_ended() {
                prop_assert_eq!(&next, &state);
            }
            // completion happens exactly when the cursor reaches the sentinel
            prop_assert_eq!(next.has_ended(), next.cursor() == next.text().len() - 1);

            state = next;
        }

        prop_assert!(metrics::correct_word_count(&state) <= total_words);
    }
}
