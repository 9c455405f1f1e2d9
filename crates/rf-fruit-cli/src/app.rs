//! Game loop — menu, bet entry, paytable screen and round presentation

use std::io;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use rf_fruit_slot::{
    CancelToken, FlashConfig, FlashHandle, RoundController, SlotError, SpinAnimation, ThreadPacer,
    spawn_flash,
};

use crate::input::{Key, Keyboard, LineInput};
use crate::ui::{FlashMessage, Screen};

const MENU: &[&str] = &[
    "Enter.: Play",
    "A.....: Change bet",
    "H.....: Paytable",
    "X.....: Exit",
];

/// Presentation options
#[derive(Debug, Clone)]
pub struct GameOptions {
    pub animation: SpinAnimation,
    pub flash: FlashConfig,
    /// Suppress the terminal bell
    pub mute: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            animation: SpinAnimation::normal(),
            flash: FlashConfig::default(),
            mute: false,
        }
    }
}

/// Where to go after a screen closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Menu,
    Quit,
}

/// Interactive game
pub struct Game {
    round: RoundController,
    screen: Arc<Mutex<Screen>>,
    keyboard: Keyboard,
    options: GameOptions,
    flash: Option<FlashHandle<Screen>>,
}

impl Game {
    pub fn new(round: RoundController, options: GameOptions) -> Self {
        Self {
            round,
            screen: Arc::new(Mutex::new(Screen::new())),
            keyboard: Keyboard::new(),
            options,
            flash: None,
        }
    }

    /// Run until the player exits
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.draw_menu()?;
            let next = match self.keyboard.read_key()? {
                Key::Char('x' | 'X') | Key::Interrupt => Next::Quit,
                Key::Char('h' | 'H') => self.show_paytable()?,
                Key::Char('a' | 'A') => self.change_bet()?,
                Key::Enter => self.play()?,
                _ => Next::Menu,
            };
            if next == Next::Quit {
                break;
            }
        }

        self.cancel_flash();
        let stats = self.round.stats().clone();
        let mut screen = self.screen.lock();
        screen.footer("Thanks for playing. See you soon!")?;
        if stats.total_spins > 0 {
            screen.info(&format!(
                "{} spins, {} wagered, {} won, biggest payout {}",
                stats.total_spins, stats.total_wagered, stats.total_won, stats.biggest_payout
            ))?;
        }
        log::info!(
            "Session ended: {} spins, RTP {:.2}%, balance {}",
            stats.total_spins,
            stats.rtp(),
            self.round.balance()
        );
        Ok(())
    }

    fn draw_menu(&mut self) -> io::Result<()> {
        let mut screen = self.screen.lock();
        screen.clear()?;
        screen.header()?;
        screen.credits(self.round.balance())?;
        screen.info(&format!("Bet: {}", self.round.bet()))?;
        screen.menu(MENU)
    }

    fn press_any_key(&mut self, message: &str) -> io::Result<Key> {
        {
            let mut screen = self.screen.lock();
            screen.blank()?;
            screen.info(message)?;
        }
        self.keyboard.read_key()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SCREENS
    // ═══════════════════════════════════════════════════════════════════════════

    fn show_paytable(&mut self) -> Result<Next> {
        {
            let mut screen = self.screen.lock();
            screen.clear()?;
            screen.header()?;
            screen.info("Paytable (multipliers on the bet):")?;
            screen.divider()?;
            let paytable = self.round.paytable();
            screen.pay_entries(&paytable.entries())?;
            screen.info(&format!(
                "Any other three of a kind pays x{}",
                paytable.fallback_multiplier()
            ))?;
            screen.divider()?;
        }
        self.press_any_key("Press any key to return to the menu.")?;
        Ok(Next::Menu)
    }

    fn change_bet(&mut self) -> Result<Next> {
        let limits = self.round.limits();
        {
            let mut screen = self.screen.lock();
            screen.clear()?;
            screen.header()?;
            screen.info(&format!(
                "Current bet: {} | Allowed range: {}-{}",
                self.round.bet(),
                limits.min_bet,
                limits.max_bet
            ))?;
            screen.info("Type a new bet and press Enter, or Esc to go back.")?;
        }

        let text = match self.keyboard.read_line_with_esc(&mut io::stdout())? {
            LineInput::Cancelled => return Ok(Next::Menu),
            LineInput::Submitted(text) => text,
        };

        {
            let mut screen = self.screen.lock();
            screen.blank()?;
            match self.round.change_bet_from_input(&text) {
                Ok(()) => screen.success(&format!("Bet updated to {}.", self.round.bet()))?,
                Err(e) if e.is_recoverable() => screen.error(&e.to_string())?,
                Err(e) => return Err(e.into()),
            }
        }
        self.press_any_key("Press any key to continue...")?;
        Ok(Next::Menu)
    }

    fn play(&mut self) -> Result<Next> {
        loop {
            self.cancel_flash();
            if !self.round.can_afford() {
                self.screen
                    .lock()
                    .error("Not enough credits for this bet.")?;
                self.press_any_key("Press any key to continue...")?;
                return Ok(Next::Menu);
            }

            self.play_round()?;

            loop {
                match self.keyboard.read_key()? {
                    Key::Enter => break,
                    Key::Escape => {
                        self.cancel_flash();
                        return Ok(Next::Menu);
                    }
                    Key::Char('q' | 'Q') | Key::Interrupt => {
                        self.cancel_flash();
                        return Ok(Next::Quit);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Draw the round screen, spin, and start the result flash
    fn play_round(&mut self) -> Result<()> {
        let bet = self.round.bet();
        let reel_row = {
            let mut screen = self.screen.lock();
            screen.clear()?;
            screen.header()?;
            screen.credits(self.round.balance().saturating_sub(bet))?;
            screen.info(&format!("Bet: {bet}"))?;
            screen.divider()?;
            screen.reserve()?
        };

        let skip = CancelToken::new();
        let screen = Arc::clone(&self.screen);
        let keyboard = &mut self.keyboard;
        let result = self.round.play_round_animated(
            &self.options.animation,
            &skip,
            &mut ThreadPacer,
            |frame| {
                if let Err(e) = screen.lock().reels(reel_row, &frame.symbols, false) {
                    log::debug!("Frame draw failed: {}", e);
                }
                match keyboard.poll_skip() {
                    Ok(true) => skip.cancel(),
                    Ok(false) => {}
                    Err(e) => log::debug!("Key poll failed: {}", e),
                }
            },
        );

        let result = match result {
            Ok(result) => result,
            Err(e @ SlotError::InsufficientFunds { .. }) => {
                self.screen.lock().error(&e.to_string())?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let (text, color) = Screen::result_message(&result);
        {
            let mut screen = self.screen.lock();
            screen.reels(reel_row, &result.symbols, true)?;
            screen.divider()?;
            let flash_row = screen.reserve()?;
            screen.blank()?;
            screen.divider()?;
            screen.credits(self.round.balance())?;
            screen.info("Enter: Play again | Esc: Back | Q: Quit")?;
            screen.set_flash(FlashMessage {
                row: flash_row,
                text,
                color,
            });
            if !self.options.mute {
                screen.beep()?;
            }
        }

        self.flash = Some(spawn_flash(
            self.options.flash,
            CancelToken::new(),
            Arc::clone(&self.screen),
        ));
        Ok(())
    }

    fn cancel_flash(&mut self) {
        if let Some(flash) = self.flash.take() {
            flash.cancel();
        }
    }
}
