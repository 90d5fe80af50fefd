use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::format::{bytes_to_kib, format_time_hms, pages_to_kb, truncate_unicode};
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

/// Widths of the fixed columns, PID through %CPU.
pub const COLUMN_WIDTHS: [usize; 8] = [6, 1, 6, 6, 8, 8, 10, 6];
pub const MIN_COMMAND_WIDTH: usize = 10;
pub const MAX_COMMAND_WIDTH: usize = 80;

/// Width taken by the fixed columns, one separator after each.
pub const fn fixed_width() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < COLUMN_WIDTHS.len() {
        total += COLUMN_WIDTHS[i] + 1;
        i += 1;
    }
    total
}

/// Columns left over for COMMAND on a terminal `cols` wide.
pub fn command_width(cols: usize) -> usize {
    cols.saturating_sub(fixed_width())
        .clamp(MIN_COMMAND_WIDTH, MAX_COMMAND_WIDTH)
}

/// Units needed to turn raw counters into display values.
#[derive(Debug, Clone, Copy)]
pub struct RowUnits {
    pub page_size: u64,
    pub clock_ticks: u64,
}

pub fn header_row(cmd_width: usize) -> String {
    format!(
        "{:>6} {} {:>6} {:>6} {:>8} {:>8} {:>10} {:>6} {:<cmd_width$}",
        "PID", "S", "PPID", "PGRP", "VIRT", "RES", "TIME+", "%CPU", "COMMAND"
    )
}

pub fn format_row(record: &ProcessRecord, cmd_width: usize, units: RowUnits) -> String {
    format!(
        "{:>6} {} {:>6} {:>6} {:>8} {:>8} {:>10} {:>6.1} {}",
        record.pid,
        record.state,
        record.ppid,
        record.pgrp,
        bytes_to_kib(record.vsize),
        pages_to_kb(record.rss, units.page_size),
        format_time_hms(record.total_ticks(), units.clock_ticks),
        record.cpu_percent,
        truncate_unicode(&record.command, cmd_width),
    )
}

pub fn render<'a>(
    frame: &mut Frame,
    area: Rect,
    procs: impl IntoIterator<Item = &'a ProcessRecord>,
    units: RowUnits,
    theme: &Theme,
) {
    if area.height == 0 {
        return;
    }
    let cmd_width = command_width(usize::from(area.width));

    let mut lines = Vec::with_capacity(usize::from(area.height));
    lines.push(Line::from(Span::styled(
        header_row(cmd_width),
        Style::default()
            .fg(theme.table_header_fg)
            .bg(theme.table_header_bg)
            .add_modifier(Modifier::BOLD),
    )));

    let rows = usize::from(area.height) - 1;
    for record in procs.into_iter().take(rows) {
        let style = if record.cpu_percent >= 50.0 {
            Style::default().fg(theme.cpu_hot)
        } else {
            Style::default().fg(theme.text_primary)
        };
        lines.push(Line::from(Span::styled(
            format_row(record, cmd_width, units),
            style,
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
