//! Keyboard input
//!
//! Thin layer over crossterm events: key presses only, releases and
//! repeats from platforms that report them are dropped.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;

/// Player intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Char(char),
    /// Ctrl+C
    Interrupt,
    Other,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

fn next_press() -> io::Result<Key> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key.into());
            }
        }
    }
}

/// Keyboard with a queue for keys pressed while the game was busy
#[derive(Debug, Default)]
pub struct Keyboard {
    pending: VecDeque<Key>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next key press, queued keys first
    pub fn read_key(&mut self) -> io::Result<Key> {
        match self.pending.pop_front() {
            Some(key) => Ok(key),
            None => next_press(),
        }
    }

    /// Drain waiting presses without blocking; true if one asks to skip
    ///
    /// Space and Escape skip. Every other key is queued for `read_key`.
    pub fn poll_skip(&mut self) -> io::Result<bool> {
        let mut skip = false;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    skip |= self.accept(key.into());
                }
            }
        }
        Ok(skip)
    }

    fn accept(&mut self, key: Key) -> bool {
        match key {
            Key::Char(' ') | Key::Escape => true,
            other => {
                self.pending.push_back(other);
                false
            }
        }
    }

    /// Read a line with echo; Escape cancels
    pub fn read_line_with_esc(&mut self, out: &mut impl Write) -> io::Result<LineInput> {
        let mut editor = LineEditor::default();
        loop {
            let key = self.read_key()?;
            let before = editor.as_str().chars().count();
            if let Some(done) = editor.apply(key) {
                return Ok(done);
            }
            let after = editor.as_str().chars().count();
            if after > before {
                if let Key::Char(c) = key {
                    queue!(out, Print(c))?;
                }
            } else if after < before {
                queue!(out, Print("\u{8} \u{8}"))?;
            }
            out.flush()?;
        }
    }
}

/// Outcome of the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInput {
    Submitted(String),
    Cancelled,
}

/// Line buffer with Backspace support
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    /// Apply one key; returns the final outcome on Enter or Escape
    pub fn apply(&mut self, key: Key) -> Option<LineInput> {
        match key {
            Key::Enter => Some(LineInput::Submitted(std::mem::take(&mut self.buffer))),
            Key::Escape | Key::Interrupt => Some(LineInput::Cancelled),
            Key::Backspace => {
                self.buffer.pop();
                None
            }
            Key::Char(c) if !c.is_control() => {
                self.buffer.push(c);
                None
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}
