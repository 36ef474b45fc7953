use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Popup, UsdDisplay};
use crate::counter::Counter;
use crate::theme::Theme;

/// Width of one input box, borders included
const FIELD_WIDTH: u16 = 22;

// Colors are resolved once, from the theme chosen at startup
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already initialized");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Length(3), // 億
            Constraint::Length(3), // 万
            Constraint::Length(3), // 円
            Constraint::Length(3), // Submit
            Constraint::Length(1), // Result
            Constraint::Min(0),
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    for (i, counter) in Counter::ALL.iter().enumerate() {
        draw_field(f, app, *counter, chunks[i + 1]);
    }
    draw_submit_button(f, app, chunks[4]);
    draw_result_line(f, app, chunks[5]);
    draw_footer(f, chunks[7]);

    if app.popup == Popup::Help {
        draw_help_popup(f);
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(warning())))
    } else {
        Line::from(vec![
            Span::styled("Rate ", Style::default().fg(text_dim())),
            Span::styled(app.rate.value().to_string(), Style::default().fg(text())),
            Span::styled(" USD/円", Style::default().fg(text_dim())),
        ])
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_field(f: &mut Frame, app: &App, counter: Counter, area: Rect) {
    let is_active = app.focus == Focus::Field(counter);
    let border_color = if is_active { accent() } else { inactive() };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(FIELD_WIDTH),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let value = app.field_text(counter);
    let content = if value.is_empty() {
        Span::styled("0", Style::default().fg(text_dim()))
    } else {
        Span::styled(value.clone(), Style::default().fg(text()))
    };

    let input = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    f.render_widget(input, chunks[1]);

    let suffix = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", counter.suffix()),
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
    ]);
    f.render_widget(suffix, chunks[2]);

    if is_active && app.popup == Popup::None {
        // Inside the border, after the typed text
        let inner_width = FIELD_WIDTH.saturating_sub(2);
        let offset = (value.len() as u16).min(inner_width.saturating_sub(1));
        f.set_cursor_position((chunks[1].x + 1 + offset, chunks[1].y + 1));
    }
}

fn draw_submit_button(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.focus == Focus::Submit;
    let (border_color, style) = if is_active {
        (
            accent(),
            Style::default().fg(accent()).bg(bg_selected()).add_modifier(Modifier::BOLD),
        )
    } else {
        (inactive(), Style::default().fg(text()))
    };

    let button_area = Rect {
        x: area.x + 1,
        width: 12.min(area.width.saturating_sub(1)),
        ..area
    };

    let button = Paragraph::new(Span::styled("Submit", style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );
    f.render_widget(button, button_area);
}

fn draw_result_line(f: &mut Frame, app: &App, area: Rect) {
    let color = match app.display {
        UsdDisplay::Unsubmitted => text_dim(),
        UsdDisplay::Submitted(_) => success(),
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(app.result_line(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let keys = [
        ("Tab", "next"),
        ("Enter", "submit"),
        ("^U", "clear"),
        ("^S", "save rate"),
        ("F1", "help"),
        ("^C", "quit"),
    ];

    let mut spans = Vec::new();
    for (i, (key, label)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(inactive())));
        }
        spans.push(Span::styled(*key, Style::default().fg(accent())));
        spans.push(Span::styled(format!(" {}", label), Style::default().fg(text_dim())));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(60, 60, f.area());

    f.render_widget(Clear, popup_area);

    let key_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), Style::default().fg(accent())),
            Span::styled(desc, Style::default().fg(text())),
        ])
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("═══ Form ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        key_line("Tab / ↓", "Next field"),
        key_line("S-Tab / ↑", "Previous field"),
        key_line("0-9", "Type into the focused field"),
        key_line("Backspace", "Delete last digit"),
        key_line("Del / ^U", "Clear the field"),
        key_line("Enter", "Convert to USD"),
        Line::from(""),
        Line::from(Span::styled("═══ Other ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        key_line("^S", "Save the current rate as default"),
        key_line("q", "Quit (from the Submit button)"),
        key_line("^C", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  Blank fields and non-numeric input count as 0.",
            Style::default().fg(text_dim()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" okuman Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::convert::ExchangeRate;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        App::new(ExchangeRate::new(0.0067).unwrap(), AppConfig::default())
    }

    #[test]
    fn test_draws_placeholder_before_submit() {
        let screen = render(&app());
        assert!(screen.contains("USD: 0$"));
        assert!(screen.contains("Submit"));
        assert!(screen.contains("Rate 0.0067"));
    }

    #[test]
    fn test_draws_submitted_amount() {
        let mut app = app();
        app.inputs.ichi = 100;
        app.submit();
        let screen = render(&app);
        assert!(screen.contains("USD: $0.67$"));
        assert!(screen.contains("100"));
    }

    #[test]
    fn test_draws_help_popup() {
        let mut app = app();
        app.popup = Popup::Help;
        assert!(render(&app).contains("okuman Help"));
    }
}
