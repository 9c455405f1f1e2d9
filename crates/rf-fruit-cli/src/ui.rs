//! Terminal renderer
//!
//! All drawing goes through one `Screen` behind a mutex, shared with the
//! flash effect thread. The screen runs in raw mode, so every line ends with
//! an explicit carriage return.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

use rf_fruit_slot::{EvaluatedSpin, FlashPhase, FlashSink, PayEntry, Symbol};

const WIDTH: usize = 50;

const TITLE: &[&str] = &[
    " ___ ___ _   _ ___ _____   ___ _    ___ _____ ",
    "| __| _ \\ | | |_ _|_   _| / __| |  / _ \\_   _|",
    "| _||   / |_| || |  | |   \\__ \\ |_| (_) || |  ",
    "|_| |_|_\\\\___/|___| |_|   |___/____\\___/ |_|  ",
];

/// Message flashed under the reels after a round
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub row: u16,
    pub text: String,
    pub color: Color,
}

/// Raw-mode terminal screen
pub struct Screen {
    out: Stdout,
    /// Next row to draw on
    row: u16,
    flash: Option<FlashMessage>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            row: 0,
            flash: None,
        }
    }

    /// Clear and home the cursor
    pub fn clear(&mut self) -> io::Result<()> {
        self.flash = None;
        self.row = 0;
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn line(&mut self, text: &str, fg: Option<Color>, bg: Option<Color>) -> io::Result<()> {
        queue!(self.out, MoveTo(0, self.row))?;
        if let Some(bg) = bg {
            queue!(self.out, SetBackgroundColor(bg))?;
        }
        if let Some(fg) = fg {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        queue!(self.out, Print(text), ResetColor, Print("\r\n"))?;
        self.row += 1;
        self.out.flush()
    }

    pub fn blank(&mut self) -> io::Result<()> {
        self.line("", None, None)
    }

    pub fn divider(&mut self) -> io::Result<()> {
        self.line(&"─".repeat(WIDTH), None, None)
    }

    pub fn header(&mut self) -> io::Result<()> {
        let top = format!("┌{}┐", "─".repeat(WIDTH - 2));
        let bottom = format!("└{}┘", "─".repeat(WIDTH - 2));
        self.line(&top, Some(Color::Yellow), Some(Color::DarkMagenta))?;
        for art in TITLE {
            let padded = format!("│{:<width$}│", art, width = WIDTH - 2);
            self.line(&padded, Some(Color::Yellow), Some(Color::DarkMagenta))?;
        }
        self.line(&bottom, Some(Color::Yellow), Some(Color::DarkMagenta))
    }

    pub fn credits(&mut self, balance: u64) -> io::Result<()> {
        self.line(&format!("Credits: {balance}"), Some(Color::Green), None)
    }

    pub fn menu(&mut self, items: &[&str]) -> io::Result<()> {
        self.divider()?;
        for item in items {
            self.line(&format!(" - {item}"), None, Some(Color::DarkBlue))?;
        }
        self.divider()
    }

    pub fn info(&mut self, text: &str) -> io::Result<()> {
        self.line(text, Some(Color::Grey), None)
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        self.line(text, Some(Color::Red), None)
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        self.line(text, Some(Color::Green), None)
    }

    pub fn footer(&mut self, text: &str) -> io::Result<()> {
        self.divider()?;
        self.line(text, Some(Color::Yellow), None)
    }

    /// Paytable screen rows
    pub fn pay_entries(&mut self, entries: &[PayEntry]) -> io::Result<()> {
        for entry in entries {
            self.line(
                &format!("  {:<30} x {}", entry.description, entry.multiplier),
                None,
                None,
            )?;
        }
        Ok(())
    }

    /// Reserve a row for the reels and return it
    pub fn reserve(&mut self) -> io::Result<u16> {
        let row = self.row;
        self.blank()?;
        Ok(row)
    }

    /// Redraw the reel line in place
    pub fn reels(&mut self, row: u16, symbols: &[Symbol], settled: bool) -> io::Result<()> {
        let text: Vec<String> = symbols.iter().map(|s| format!("[{s}]")).collect();
        let (fg, bg) = if settled {
            (Color::Magenta, Color::Reset)
        } else {
            (Color::White, Color::Blue)
        };
        queue!(
            self.out,
            MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(text.join(" ")),
            ResetColor
        )?;
        self.out.flush()
    }

    /// Text describing a settled round
    pub fn result_message(result: &EvaluatedSpin) -> (String, Color) {
        match result.winning_symbol() {
            Some(symbol) if result.is_win() => (
                format!(
                    "🎉 {} of {} - you won {} credits (x{})",
                    result.combination(),
                    symbol,
                    result.payout(),
                    result.multiplier()
                ),
                Color::Yellow,
            ),
            _ => ("😢 No prize this time...".to_string(), Color::Red),
        }
    }

    /// Set the message the flash effect draws
    pub fn set_flash(&mut self, message: FlashMessage) {
        self.flash = Some(message);
    }

    /// Terminal bell
    pub fn beep(&mut self) -> io::Result<()> {
        execute!(self.out, Print("\x07"))
    }

    fn draw_flash(&mut self, phase: FlashPhase) -> io::Result<()> {
        let Some(message) = self.flash.clone() else {
            return Ok(());
        };
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(WIDTH);
        queue!(self.out, MoveTo(0, message.row), Clear(ClearType::CurrentLine))?;
        if phase == FlashPhase::Show {
            queue!(
                self.out,
                SetForegroundColor(message.color),
                Print(format!("{:<width$}", message.text, width = width.saturating_sub(1))),
                ResetColor
            )?;
        }
        self.out.flush()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashSink for Screen {
    fn draw(&mut self, phase: FlashPhase) {
        if let Err(e) = self.draw_flash(phase) {
            log::debug!("Flash draw failed: {}", e);
        }
    }
}

/// Puts the terminal in raw mode for the lifetime of the guard
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, Show, Print("\r\n"));
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_fruit_slot::{Combination, Evaluation, SpinResult};

    #[test]
    fn test_win_message() {
        let result = SpinResult::new(vec![Symbol::new("🍒"), Symbol::new("🍒"), Symbol::new("🍋")])
            .with_evaluation(Evaluation {
                combination: Combination::TwoOfKind,
                winning_symbol: Some(Symbol::new("🍒")),
                multiplier: 1.5,
                payout: 15,
            });
        let (text, color) = Screen::result_message(&result);
        assert_eq!(text, "🎉 Two of a kind of 🍒 - you won 15 credits (x1.5)");
        assert_eq!(color, Color::Yellow);
    }

    #[test]
    fn test_loss_message() {
        let result = SpinResult::new(vec![Symbol::new("A"), Symbol::new("B"), Symbol::new("C")])
            .with_evaluation(Evaluation::no_win());
        let (text, color) = Screen::result_message(&result);
        assert!(text.contains("No prize"));
        assert_eq!(color, Color::Red);
    }
}
