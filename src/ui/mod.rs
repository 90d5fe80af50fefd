pub mod header;
pub mod statusbar;
pub mod table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::ui::header::HeaderInfo;
use crate::ui::table::RowUnits;
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = Theme::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let procs = app.processes();
    let info = HeaderInfo {
        release: &app.facts.release,
        machine: &app.facts.machine,
        cpu_percent: app.cpu.percent,
        memory: &app.memory,
        tasks: procs.len(),
        sort_mode: app.sort_mode,
        refresh_ms: app.refresh_interval.as_millis(),
    };
    header::render(frame, chunks[0], &info, &theme);

    let units = RowUnits {
        page_size: app.page_size,
        clock_ticks: app.clock_ticks,
    };
    table::render(frame, chunks[1], procs, units, &theme);

    statusbar::render(
        frame,
        chunks[2],
        &app.keybinds.help_entries(),
        app.status_message.as_ref(),
        &theme,
    );
}
