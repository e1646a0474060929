//! Stateless UI rendering for the three pegs.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use strictly_hanoi::{Disk, GamePhase, Peg, format_elapsed};

use super::app::Snapshot;

const DISK_COLORS: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

const HELP: &str = "1-3 pick/drop  Enter start  p pause  s solve  c cancel  r reset  +/- disks  q quit";

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, view: &Snapshot, status: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(8),    // Pegs
            Constraint::Length(3), // Stats
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Strictly Hanoi")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_pegs(frame, chunks[1], view);

    let stats = Paragraph::new(stats_line(view))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(stats, chunks[2]);

    let status_text = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_text, chunks[3]);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

fn draw_pegs(frame: &mut Frame, area: Rect, view: &Snapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for peg in Peg::all() {
        let paragraph = Paragraph::new(peg_lines(view, peg)).alignment(Alignment::Center);
        frame.render_widget(paragraph, cols[peg.index()]);
    }
}

/// Pole, disks bottom-aligned, base and label for one peg.
fn peg_lines(view: &Snapshot, peg: Peg) -> Vec<Line<'static>> {
    let height = usize::from(view.disk_count.get());
    let disks = view.tower.peg(peg);
    let selected = view.selected == Some(peg);
    let pole = Style::default().fg(Color::DarkGray);

    let mut lines = vec![Line::from(Span::styled("|", pole))];
    for level in (0..height).rev() {
        let line = match disks.get(level) {
            Some(&disk) => {
                let is_top = level + 1 == disks.len();
                Line::from(disk_span(disk, selected && is_top))
            }
            None => Line::from(Span::styled("|", pole)),
        };
        lines.push(line);
    }
    lines.push(Line::from(Span::styled(
        "━".repeat(2 * height + 3),
        Style::default().fg(Color::Gray),
    )));

    let label_style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(
        format!(" Peg {} ", peg.label()),
        label_style,
    )));
    lines
}

fn disk_span(disk: Disk, lifted: bool) -> Span<'static> {
    let size = usize::from(disk.size());
    let color = DISK_COLORS[(size - 1) % DISK_COLORS.len()];
    let mut style = Style::default().fg(color);
    if lifted {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    Span::styled("█".repeat(2 * size + 1), style)
}

fn stats_line(view: &Snapshot) -> String {
    let best = match view.best {
        Some(record) => format!(
            "{} moves in {}",
            record.moves(),
            format_elapsed(Duration::from_secs(record.seconds()))
        ),
        None => "none".to_string(),
    };
    let phase = match view.phase {
        GamePhase::ShowingSolution => "solving".to_string(),
        phase => phase.to_string(),
    };
    format!(
        "Disks {}   Moves {}/{}   Time {}   {}   Best: {}",
        view.disk_count,
        view.move_count,
        view.min_moves,
        format_elapsed(view.elapsed),
        phase,
        best
    )
}
