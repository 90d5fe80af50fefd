use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use crate::format::kib_to_gib;
use crate::system::meminfo::MemoryStats;
use crate::system::sort::SortMode;
use crate::ui::theme::Theme;

/// What the four header lines show.
pub struct HeaderInfo<'a> {
    pub release: &'a str,
    pub machine: &'a str,
    pub cpu_percent: f64,
    pub memory: &'a MemoryStats,
    pub tasks: usize,
    pub sort_mode: SortMode,
    pub refresh_ms: u128,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo<'_>, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(area);

    let identity = Line::from(vec![
        Span::styled(
            " proctop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Kernel {}  Machine {}", info.release, info.machine),
            Style::default().fg(theme.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(identity), rows[0]);

    let cpu_ratio = (info.cpu_percent / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(cpu_ratio)
        .label(format!("CPU {:5.1}%", info.cpu_percent));
    frame.render_widget(gauge, rows[1]);

    frame.render_widget(Paragraph::new(memory_line(info.memory)), rows[2]);

    let tasks = Line::from(vec![
        Span::styled(
            format!("Tasks: {}", info.tasks),
            Style::default().fg(theme.text_primary),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Sort: {}", info.sort_mode.label()),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Refresh: {} ms", info.refresh_ms),
            Style::default().fg(theme.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(tasks), rows[3]);
}

pub fn memory_line(memory: &MemoryStats) -> String {
    format!(
        "Mem: {:.2} GB / {:.2} GB ({:.1}%)  free {:.2} GB  avail {:.2} GB",
        kib_to_gib(memory.used as f64),
        kib_to_gib(memory.total as f64),
        memory.used_percent,
        kib_to_gib(memory.free as f64),
        kib_to_gib(memory.available as f64),
    )
}
