use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    session::{Annotation, SessionState},
};

const LEGEND: &str = "(ctrl+r) retry / (ctrl+n) new / (esc) quit";

/// Progress through the passage, e.g. `[3/50]`.
pub fn progress_label(session: &SessionState) -> String {
    format!(
        "[{}/{}]",
        session.current_word_index(),
        session.total_words()
    )
}

/// One styled span per character of the passage.
pub fn annotated_spans(session: &SessionState) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let cursor_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);

    session
        .text()
        .chars()
        .zip(session.annotations())
        .enumerate()
        .map(|(idx, (expected, annotation))| {
            if idx == session.cursor() && !session.has_ended() {
                return Span::styled(expected.to_string(), cursor_style);
            }
            let style = match annotation {
                Annotation::Correct => green_bold_style,
                Annotation::Incorrect => red_bold_style,
                Annotation::Untouched => dim_bold_style,
            };
            Span::styled(expected.to_string(), style)
        })
        .collect()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default()
            .add_modifier(Modifier::ITALIC)
            .add_modifier(Modifier::DIM);

        let horizontal_margin = area.width / 10;
        let max_chars_per_line = area.width.saturating_sub(horizontal_margin * 2).max(1);
        let text_width = session.text().width();
        let prompt_occupied_lines = if text_width <= max_chars_per_line as usize {
            1
        } else {
            (text_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
        };
        let legend_lines = if session.has_ended() { 2 } else { 0 };
        let content_lines = 2 + prompt_occupied_lines + legend_lines;
        let top_padding = area.height.saturating_sub(content_lines) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(horizontal_margin)
            .constraints([
                Constraint::Length(top_padding),
                Constraint::Length(1), // progress + metrics
                Constraint::Length(1), // padding
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(legend_lines),
                Constraint::Min(0),
            ])
            .split(area);

        let mut header = progress_label(session);
        if self.shows_metrics() {
            header.push_str("   ");
            header.push_str(&self.metrics().to_string());
        }
        Paragraph::new(Span::styled(header, bold_style)).render(chunks[1], buf);

        Paragraph::new(Line::from(annotated_spans(session)))
            .alignment(if prompt_occupied_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        if session.has_ended() {
            let legend_area = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1)])
                .split(chunks[4])[1];
            Paragraph::new(Span::styled(LEGEND, italic_style))
                .alignment(Alignment::Center)
                .render(legend_area, buf);
        }
    }
}
