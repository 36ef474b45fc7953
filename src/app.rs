use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::convert::{result_line, Conversion, ExchangeRate, PLACEHOLDER};
use crate::counter::{display_field, parse_field, Counter, CounterInputs};

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Counter),
    Submit,
}

impl Focus {
    const ORDER: [Focus; 4] = [
        Focus::Field(Counter::Oku),
        Focus::Field(Counter::Man),
        Focus::Field(Counter::Ichi),
        Focus::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// What the result line shows
#[derive(Debug, Clone, PartialEq)]
pub enum UsdDisplay {
    Unsubmitted,
    Submitted(Conversion),
}

impl UsdDisplay {
    pub fn amount(&self) -> &str {
        match self {
            UsdDisplay::Unsubmitted => PLACEHOLDER,
            UsdDisplay::Submitted(conversion) => &conversion.display,
        }
    }
}

pub struct App {
    pub focus: Focus,
    pub popup: Popup,

    // Form state, only combined on submit
    pub inputs: CounterInputs,
    pub rate: ExchangeRate,
    pub display: UsdDisplay,

    pub config: AppConfig,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(rate: ExchangeRate, config: AppConfig) -> Self {
        Self {
            focus: Focus::Field(Counter::Oku),
            popup: Popup::None,
            inputs: CounterInputs::default(),
            rate,
            display: UsdDisplay::Unsubmitted,
            config,
            status_message: None,
            status_message_time: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Text currently rendered inside a field's input box
    pub fn field_text(&self, counter: Counter) -> String {
        display_field(Some(self.inputs.get(counter)))
    }

    pub fn result_line(&self) -> String {
        result_line(self.display.amount(), self.config.trailing_symbol)
    }

    /// Whether `key` should leave the application
    pub fn is_quit_key(&self, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        // Letters are ordinary input while a field has focus
        self.popup == Popup::None
            && self.focus == Focus::Submit
            && matches!(key.code, KeyCode::Char('q'))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            self.handle_popup_key(key);
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.handle_control_key(key);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),

            // Enter submits the form from anywhere, like a browser form
            KeyCode::Enter => self.submit(),

            KeyCode::Esc => {
                self.status_message = None;
                self.status_message_time = None;
            }

            KeyCode::F(1) => self.popup = Popup::Help,

            code => match self.focus {
                Focus::Field(counter) => self.edit_field(counter, code),
                Focus::Submit => match code {
                    KeyCode::Char(' ') => self.submit(),
                    KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
                    _ => {}
                },
            },
        }
        Ok(())
    }

    fn handle_control_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Clear the focused field
            KeyCode::Char('u') => {
                if let Focus::Field(counter) = self.focus {
                    self.inputs.set(counter, 0);
                }
            }
            KeyCode::Char('s') => self.save_rate_as_default()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('q')
        ) {
            self.popup = Popup::None;
        }
    }

    /// Controlled input: edit the rendered text, then normalize it back
    fn edit_field(&mut self, counter: Counter, code: KeyCode) {
        let mut text = self.field_text(counter);
        match code {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Delete => text.clear(),
            _ => return,
        }
        self.inputs.set(counter, parse_field(&text));
    }

    /// Combine the fields and convert. The only place the display changes.
    pub fn submit(&mut self) {
        let conversion = Conversion::compute(&self.inputs, self.rate);
        tracing::debug!(
            yen = %conversion.yen,
            usd = conversion.usd,
            "Converted {}億 {}万 {}円",
            conversion.inputs.oku,
            conversion.inputs.man,
            conversion.inputs.ichi
        );
        self.display = UsdDisplay::Submitted(conversion);
    }

    fn save_rate_as_default(&mut self) -> Result<()> {
        self.config.default_rate = Some(self.rate.value());
        self.config.save()?;
        tracing::info!("Saved default rate {}", self.rate.value());
        self.set_status(format!("Saved {} as default rate", self.rate.value()));
        Ok(())
    }

    /// Periodic housekeeping between key events
    pub fn tick(&mut self) {
        if let Some(set_at) = self.status_message_time {
            if set_at.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}
