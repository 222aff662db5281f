//! Speed and accuracy derived from a session snapshot. Nothing here mutates
//! the session; live figures simply re-read the clock.

use std::fmt;
use std::time::{Duration, SystemTime};

use crate::clock::{elapsed_between, Clock};
use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u32,
}

impl Metrics {
    pub fn compute(state: &SessionState, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            wpm: wpm(state, now),
            accuracy: accuracy(state),
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WPM: {}  ACC: {}%", self.wpm, self.accuracy)
    }
}

/// Words passed so far without any mistyped character.
pub fn correct_word_count(state: &SessionState) -> usize {
    let passed = state.current_word_index();
    let mistyped = state
        .word_had_mistake()
        .iter()
        .take(passed)
        .filter(|&&m| m)
        .count();
    passed - mistyped
}

/// Frozen duration once ended, time since the first keystroke while running,
/// `None` before the session starts.
pub fn elapsed(state: &SessionState, now: SystemTime) -> Option<Duration> {
    match (state.duration(), state.started_at()) {
        (Some(frozen), _) => Some(frozen),
        (None, Some(started_at)) => Some(elapsed_between(started_at, now)),
        (None, None) => None,
    }
}

pub fn wpm(state: &SessionState, now: SystemTime) -> u32 {
    let minutes = match elapsed(state, now) {
        Some(d) => d.as_secs_f64() / 60.0,
        None => return 0,
    };
    if minutes <= 0.0 {
        return 0;
    }
    (correct_word_count(state) as f64 / minutes) as u32
}

/// Share of keystrokes that matched, as a truncated percentage.
pub fn accuracy(state: &SessionState) -> u32 {
    let keystrokes = state.keystroke_count();
    if !state.has_started() || keystrokes == 0 {
        return 100;
    }
    let good = keystrokes.saturating_sub(state.mistake_count());
    (good as f64 / keystrokes as f64 * 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::Keystroke;

    fn typed(words: &[&str], input: &str, clock: &ManualClock) -> SessionState {
        let state = SessionState::new(words.iter().map(|w| w.to_string()).collect());
        state.replay(
            input.chars().map(|c| match c {
                ' ' => Keystroke::Space,
                c => Keystroke::Char(c),
            }),
            clock,
        )
    }

    #[test]
    fn test_not_started() {
        let clock = ManualClock::default();
        let state = typed(&["cat"], "", &clock);

        assert_eq!(elapsed(&state, clock.now()), None);
        assert_eq!(
            Metrics::compute(&state, &clock),
            Metrics {
                wpm: 0,
                accuracy: 100
            }
        );
    }

    #[test]
    fn test_live_elapsed_uses_now() {
        let clock = ManualClock::default();
        let state = typed(&["cat", "dog"], "c", &clock);
        clock.advance(Duration::from_secs(9));

        assert_eq!(
            elapsed(&state, clock.now()),
            Some(Duration::from_secs(9))
        );
    }

    #[test]
    fn test_live_wpm_counts_passed_words() {
        let clock = ManualClock::default();
        let mut state = typed(&["cat", "dog", "emu"], "c", &clock);
        clock.advance(Duration::from_secs(30));
        state = state.replay(
            "at ".chars().map(|c| match c {
                ' ' => Keystroke::Space,
                c => Keystroke::Char(c),
            }),
            &clock,
        );

        assert_eq!(correct_word_count(&state), 1);
        assert_eq!(wpm(&state, clock.now()), 2);
    }

    #[test]
    fn test_mistyped_words_do_not_count() {
        let clock = ManualClock::default();
        let state = typed(&["cat", "dog", "emu"], "cxt dog ", &clock);

        assert_eq!(state.current_word_index(), 2);
        assert_eq!(correct_word_count(&state), 1);
    }

    #[test]
    fn test_zero_elapsed_wpm_is_zero() {
        let clock = ManualClock::default();
        let state = typed(&["a"], "a", &clock);

        assert!(state.has_ended());
        assert_eq!(wpm(&state, clock.now()), 0);
    }

    #[test]
    fn test_final_wpm_ignores_later_clock() {
        let clock = ManualClock::default();
        let mut state = typed(&["hi"], "h", &clock);
        clock.advance(Duration::from_secs(6));
        state = state.apply(Keystroke::Char('i'), &clock);
        clock.advance(Duration::from_secs(600));

        // one word in a tenth of a minute
        assert_eq!(wpm(&state, clock.now()), 10);
    }

    #[test]
    fn test_accuracy_truncates() {
        let clock = ManualClock::default();
        let state = typed(&["cat"], "cxx", &clock);

        assert_eq!(accuracy(&state), 33);
    }

    #[test]
    fn test_display() {
        let m = Metrics {
            wpm: 72,
            accuracy: 96,
        };
        assert_eq!(m.to_string(), "WPM: 72  ACC: 96%");
    }
}
