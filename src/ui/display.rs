//! Panel rendering
//!
//! `PanelView` is the render contract as plain data. The ratatui frame and
//! the headless text output are both drawn from it.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::backend::CallOutcome;
use crate::ui::state::SimulationPanel;

pub const TITLE: &str = "CloudSave AI Dashboard";
pub const BUTTON_IDLE: &str = "Start Cold Call Simulation";
pub const BUTTON_BUSY: &str = "Conversation in Progress...";
pub const QUALIFIED_YES: &str = "✅ Yes";
pub const QUALIFIED_NO: &str = "❌ No";

/// Everything the panel shows, derived from its state
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub status: String,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub outcome: Option<OutcomeView>,
}

/// The outcome block
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeView {
    pub qualified: &'static str,
    pub reasoning: String,
    pub next_step: String,
    pub backend_note: Option<String>,
    pub json_dump: String,
}

impl PanelView {
    pub fn from_panel(panel: &SimulationPanel) -> Self {
        let loading = panel.is_loading();
        Self {
            status: panel.status().to_string(),
            button_label: if loading { BUTTON_BUSY } else { BUTTON_IDLE },
            button_enabled: panel.button_enabled(),
            outcome: panel.outcome().map(OutcomeView::from_outcome),
        }
    }

    /// Plain-text rendition used by headless mode
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(TITLE);
        out.push('\n');
        out.push_str(&format!("Status: {}\n", self.status));

        if let Some(outcome) = &self.outcome {
            out.push('\n');
            out.push_str("Call Outcome\n");
            for line in outcome.summary_lines() {
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&outcome.json_dump);
            out.push('\n');
        }
        out
    }
}

impl OutcomeView {
    pub fn from_outcome(outcome: &CallOutcome) -> Self {
        Self {
            qualified: if outcome.qualified() {
                QUALIFIED_YES
            } else {
                QUALIFIED_NO
            },
            reasoning: outcome.reasoning(),
            next_step: outcome.next_step(),
            backend_note: outcome.backend_error(),
            json_dump: outcome.pretty_json(),
        }
    }

    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Qualified: {}", self.qualified),
            format!("Reasoning: {}", self.reasoning),
            format!("Next Step: {}", self.next_step),
        ];
        if let Some(note) = &self.backend_note {
            lines.push(format!("Backend note: {}", note));
        }
        lines
    }
}

/// Draw the whole panel into the frame
pub fn draw(frame: &mut Frame, view: &PanelView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // status badge
            Constraint::Length(3), // button
            Constraint::Min(0),    // outcome
            Constraint::Length(1), // key hints
        ])
        .split(frame.size());

    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, chunks[0]);

    draw_status(frame, chunks[1], &view.status);
    draw_button(frame, chunks[2], view);

    if let Some(outcome) = &view.outcome {
        draw_outcome(frame, chunks[3], outcome);
    }

    let hints = Paragraph::new(Line::from(Span::styled(
        "Enter/Space: start   q/Esc: quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(hints, chunks[4]);
}

fn draw_status(frame: &mut Frame, area: Rect, status: &str) {
    let badge = Paragraph::new(Line::from(Span::styled(
        status.to_string(),
        Style::default().fg(Color::Yellow),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(badge, area);
}

fn draw_button(frame: &mut Frame, area: Rect, view: &PanelView) {
    let style = if view.button_enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let button = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", view.button_label),
        style,
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, area);
}

fn draw_outcome(frame: &mut Frame, area: Rect, outcome: &OutcomeView) {
    let label = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Qualified: ", label),
            Span::raw(outcome.qualified),
        ]),
        Line::from(vec![
            Span::styled("Reasoning: ", label),
            Span::raw(outcome.reasoning.clone()),
        ]),
        Line::from(vec![
            Span::styled("Next Step: ", label),
            Span::styled(outcome.next_step.clone(), Style::default().fg(Color::Green)),
        ]),
    ];
    if let Some(note) = &outcome.backend_note {
        lines.push(Line::from(vec![
            Span::styled("Backend note: ", label),
            Span::styled(note.clone(), Style::default().fg(Color::Red)),
        ]));
    }
    lines.push(Line::from(""));
    for json_line in outcome.json_dump.lines() {
        lines.push(Line::from(Span::styled(
            json_line.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Call Outcome"));
    frame.render_widget(block, area);
}
