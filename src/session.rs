use std::time::{Duration, SystemTime};

use crate::clock::{elapsed_between, Clock};

/// Character separating words in the target text. The text also ends with
/// one, which the cursor rests on once the passage is complete.
pub const SEPARATOR: char = ' ';

/// Per-character classification of the target text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum_macros::Display)]
pub enum Annotation {
    #[default]
    Untouched,
    Correct,
    Incorrect,
}

/// Input events understood by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Space,
    Backspace,
    /// Ends the host loop; never changes a session.
    Cancel,
}

/// One typing run over a fixed passage.
///
/// Values are never edited in place by callers: [`SessionState::apply`]
/// derives the next state from the current one, so any state can be kept as a
/// snapshot for rendering or replay.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    words: Vec<String>,
    text: String,
    annotations: Vec<Annotation>,
    cursor: usize,
    word_offset: usize,
    current_word_index: usize,
    word_had_mistake: Vec<bool>,
    current_word_mistakes: Vec<bool>,
    keystroke_count: usize,
    mistake_count: usize,
    started_at: Option<SystemTime>,
    duration: Option<Duration>,
}

impl SessionState {
    /// Build the passage from `words`, which must be non-empty printable ASCII
    /// (as guaranteed by [`crate::corpus::WordCorpus`]).
    pub fn new(words: Vec<String>) -> Self {
        let mut text = words.join(" ");
        text.push(SEPARATOR);
        debug_assert!(text.is_ascii(), "session text must be ASCII");

        let first_word_len = words.first().map_or(0, String::len);

        Self {
            annotations: vec![Annotation::Untouched; text.len()],
            word_had_mistake: vec![false; words.len()],
            current_word_mistakes: vec![false; first_word_len + 1],
            words,
            text,
            cursor: 0,
            word_offset: 0,
            current_word_index: 0,
            keystroke_count: 0,
            mistake_count: 0,
            started_at: None,
            duration: None,
        }
    }

    /// Derive the state that follows `key`.
    #[must_use]
    pub fn apply(&self, key: Keystroke, clock: &dyn Clock) -> SessionState {
        let mut next = self.clone();
        match key {
            Keystroke::Cancel => {}
            _ if self.has_ended() => {}
            Keystroke::Backspace => next.backspace(),
            Keystroke::Space | Keystroke::Char(SEPARATOR) => next.space(clock),
            Keystroke::Char(c) => next.type_char(c, clock),
        }
        next
    }

    /// Feed a whole key sequence, returning the final state.
    #[must_use]
    pub fn replay<I>(&self, keys: I, clock: &dyn Clock) -> SessionState
    where
        I: IntoIterator<Item = Keystroke>,
    {
        keys.into_iter()
            .fold(self.clone(), |state, key| state.apply(key, clock))
    }

    fn backspace(&mut self) {
        // never crosses back over a word boundary
        if self.cursor == 0 || self.char_at(self.cursor - 1) == SEPARATOR {
            return;
        }

        self.cursor -= 1;
        self.word_offset -= 1;
        if let Some(slot) = self.current_word_mistakes.get_mut(self.word_offset) {
            *slot = false;
        }
        self.annotations[self.cursor] = Annotation::Untouched;
        self.keystroke_count += 1;
    }

    fn space(&mut self, clock: &dyn Clock) {
        if self.cursor == 0 {
            return;
        }

        // an early space consumes the rest of the word as errors
        let last_skippable = self.text.len().saturating_sub(2);
        while self.char_at(self.cursor) != SEPARATOR && self.cursor < last_skippable {
            self.annotations[self.cursor] = Annotation::Incorrect;
            self.flag_current_word();
            self.cursor += 1;
            self.word_offset += 1;
        }

        if self.current_word_mistakes.iter().any(|&m| m) {
            if let Some(flag) = self.word_had_mistake.get_mut(self.current_word_index) {
                *flag = true;
            }
        }

        self.current_word_index += 1;
        if let Some(word) = self.words.get(self.current_word_index) {
            self.current_word_mistakes = vec![false; word.len() + 1];
        }
        self.word_offset = 0;

        self.type_char(SEPARATOR, clock);
    }

    fn type_char(&mut self, c: char, clock: &dyn Clock) {
        let expected = self.char_at(self.cursor);
        // only the space key may cross a word boundary
        if expected == SEPARATOR && c != SEPARATOR {
            return;
        }

        if c == expected {
            self.annotations[self.cursor] = Annotation::Correct;
        } else {
            self.annotations[self.cursor] = Annotation::Incorrect;
            self.mistake_count += 1;
            self.flag_current_word();
        }

        self.cursor += 1;
        self.word_offset += 1;
        self.keystroke_count += 1;

        let now = clock.now();
        let started_at = *self.started_at.get_or_insert(now);

        if self.cursor == self.text.len() - 1 {
            self.duration = Some(elapsed_between(started_at, now));
            self.current_word_index = self.words.len();
        }
    }

    fn flag_current_word(&mut self) {
        if let Some(slot) = self.current_word_mistakes.get_mut(self.word_offset) {
            *slot = true;
        }
    }

    fn char_at(&self, idx: usize) -> char {
        self.text.as_bytes()[idx] as char
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Character awaiting input.
    pub fn expected_char(&self) -> char {
        self.char_at(self.cursor)
    }

    pub fn word_offset(&self) -> usize {
        self.word_offset
    }

    pub fn current_word_index(&self) -> usize {
        self.current_word_index
    }

    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    pub fn word_had_mistake(&self) -> &[bool] {
        &self.word_had_mistake
    }

    pub fn current_word_mistakes(&self) -> &[bool] {
        &self.current_word_mistakes
    }

    pub fn keystroke_count(&self) -> usize {
        self.keystroke_count
    }

    pub fn mistake_count(&self) -> usize {
        self.mistake_count
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn has_ended(&self) -> bool {
        self.duration.is_some()
    }

    /// Frozen elapsed time, set once the passage is complete.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}
