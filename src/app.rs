use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::corpus::WordCorpus;
use crate::metrics::Metrics;
use crate::session::{Keystroke, SessionState};

/// What the host loop asks of the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Key(Keystroke),
    /// Start over on the same passage.
    Restart,
    /// Sample a fresh passage.
    NewPassage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub number_of_words: usize,
    pub live_metrics: bool,
}

/// Host-side owner of the current session.
pub struct App {
    corpus: WordCorpus,
    settings: AppSettings,
    rng: SmallRng,
    clock: Box<dyn Clock>,
    session: SessionState,
}

impl App {
    pub fn new(
        corpus: WordCorpus,
        settings: AppSettings,
        mut rng: SmallRng,
        clock: Box<dyn Clock>,
    ) -> Self {
        let session = SessionState::new(corpus.sample(settings.number_of_words, &mut rng));
        debug!(
            corpus = corpus.name(),
            words = settings.number_of_words,
            "sampled passage"
        );

        Self {
            corpus,
            settings,
            rng,
            clock,
            session,
        }
    }

    pub fn handle(&mut self, action: Action) -> Flow {
        match action {
            Action::Key(Keystroke::Cancel) => return Flow::Quit,
            Action::Key(key) => self.type_key(key),
            Action::Restart => self.restart(),
            Action::NewPassage => self.new_passage(),
        }
        Flow::Continue
    }

    fn type_key(&mut self, key: Keystroke) {
        let next = self.session.apply(key, self.clock.as_ref());

        if !self.session.has_started() && next.has_started() {
            debug!("session started");
        }
        if !self.session.has_ended() && next.has_ended() {
            let metrics = Metrics::compute(&next, self.clock.as_ref());
            info!(
                wpm = metrics.wpm,
                accuracy = metrics.accuracy,
                keystrokes = next.keystroke_count(),
                mistakes = next.mistake_count(),
                "session complete"
            );
        }

        self.session = next;
    }

    pub fn restart(&mut self) {
        info!("restarting passage");
        self.session = SessionState::new(self.session.words().to_vec());
    }

    pub fn new_passage(&mut self) {
        info!("sampling new passage");
        self.session = SessionState::new(
            self.corpus
                .sample(self.settings.number_of_words, &mut self.rng),
        );
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::compute(&self.session, self.clock.as_ref())
    }

    /// Metrics are shown live unless configured to appear only on completion.
    pub fn shows_metrics(&self) -> bool {
        self.settings.live_metrics || self.session.has_ended()
    }
}
