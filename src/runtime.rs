use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::app::Action;
use crate::session::Keystroke;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source: a reader thread forwarding crossterm events
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(AppEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    warn!(error = %err, "terminal event reader stopped");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for headless runs and tests
pub struct ChannelEventSource {
    rx: Receiver<AppEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event at a time. A quiet interval yields
/// `Tick`, which hosts use only to redraw live metrics.
pub struct Runner<E: EventSource> {
    event_source: E,
    tick_interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, tick_interval: Duration) -> Self {
        Self {
            event_source,
            tick_interval,
        }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.tick_interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

/// Translate a raw key press into an app action. Keys outside the typing
/// alphabet (printable ASCII, space, backspace) and the control shortcuts are
/// dropped.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(Action::Key(Keystroke::Cancel)),
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Some(Action::Key(Keystroke::Cancel)),
        KeyCode::Char('r') if ctrl => Some(Action::Restart),
        KeyCode::Char('n') if ctrl => Some(Action::NewPassage),
        _ if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Backspace => Some(Action::Key(Keystroke::Backspace)),
        KeyCode::Char(' ') => Some(Action::Key(Keystroke::Space)),
        KeyCode::Char(c) if c.is_ascii_graphic() => Some(Action::Key(Keystroke::Char(c))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

        assert_matches!(runner.step(), AppEvent::Tick);
    }

    #[test]
    fn step_returns_tick_when_disconnected() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

        assert_matches!(runner.step(), AppEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(10));

        assert_matches!(runner.step(), AppEvent::Resize);
    }

    #[test]
    fn maps_typing_keys() {
        assert_eq!(
            action_for(press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Key(Keystroke::Char('q')))
        );
        assert_eq!(
            action_for(press(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(Action::Key(Keystroke::Char('Q')))
        );
        assert_eq!(
            action_for(press(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::Key(Keystroke::Space))
        );
        assert_eq!(
            action_for(press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Action::Key(Keystroke::Backspace))
        );
    }

    #[test]
    fn maps_cancel_keys() {
        for key in [
            press(KeyCode::Esc, KeyModifiers::NONE),
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
            press(KeyCode::Char('d'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(action_for(key), Some(Action::Key(Keystroke::Cancel)));
        }
    }

    #[test]
    fn maps_session_shortcuts() {
        assert_eq!(
            action_for(press(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Restart)
        );
        assert_eq!(
            action_for(press(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Action::NewPassage)
        );
    }

    #[test]
    fn drops_other_keys() {
        assert_eq!(action_for(press(KeyCode::Enter, KeyModifiers::NONE)), None);
        assert_eq!(action_for(press(KeyCode::Left, KeyModifiers::NONE)), None);
        assert_eq!(action_for(press(KeyCode::Char('é'), KeyModifiers::NONE)), None);
        assert_eq!(action_for(press(KeyCode::Char('x'), KeyModifiers::ALT)), None);
        assert_eq!(action_for(press(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn drops_key_release() {
        let mut key = press(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;

        assert_eq!(action_for(key), None);
    }
}
