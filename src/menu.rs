//! Game selector
//!
//! Browsing draws the option list and reacts to button edges. Selecting a game
//! hands every following tick to its session until the session finishes.
//!
//! After a game over, confirm starts another run of the same game and
//! navigate returns here.

use embedded_graphics::pixelcolor::BinaryColor;

use crate::error::HwResult;
use crate::games;
use crate::platform::{Board, DisplayDriver, EdgeDetector};
use crate::session::{Session, SessionResult, SessionStatus};
use crate::settings::Settings;

const POWER_OFF_LABEL: &str = "Turn Off";
const FAREWELL_MS: u32 = 2000;

/// A game the menu can start
#[derive(Clone, Copy)]
pub struct GameDescriptor {
    pub label: &'static str,
    /// Builds a fresh session from the settings and an RNG seed
    pub factory: fn(&Settings, u64) -> Box<dyn Session>,
}

impl std::fmt::Debug for GameDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameDescriptor")
            .field("label", &self.label)
            .finish()
    }
}

/// Moto and Aliens, in that order
pub fn default_catalog() -> Vec<GameDescriptor> {
    vec![
        GameDescriptor {
            label: "Moto",
            factory: games::moto,
        },
        GameDescriptor {
            label: "Aliens",
            factory: games::aliens,
        },
    ]
}

/// Cursor over the option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub selected_index: usize,
    pub options: Vec<&'static str>,
}

impl MenuState {
    pub fn new(options: Vec<&'static str>) -> Self {
        Self {
            selected_index: 0,
            options,
        }
    }

    /// Move to the next option, wrapping at the end
    pub fn navigate(&mut self) {
        if !self.options.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.options.len();
        }
    }

    pub fn render(&self, display: &mut dyn DisplayDriver) -> HwResult<()> {
        display.draw_text("Select Game:", 0, 0, BinaryColor::On)?;
        for (i, label) in self.options.iter().enumerate() {
            let y = 15 + 12 * i as i32;
            if i == self.selected_index {
                display.fill_rect(0, y - 2, 128, 12, BinaryColor::On)?;
                display.draw_text(&format!("> {}. {}", i + 1, label), 5, y, BinaryColor::Off)?;
            } else {
                display.draw_text(&format!("  {}. {}", i + 1, label), 5, y, BinaryColor::On)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStatus {
    Running,
    /// The power-off entry was chosen
    PowerOff,
}

enum Mode {
    Browsing,
    Dispatched(Box<dyn Session>),
}

pub struct Menu {
    catalog: Vec<GameDescriptor>,
    state: MenuState,
    mode: Mode,
    /// Index of the power-off entry, if the menu has one
    power_off_slot: Option<usize>,
    confirm: EdgeDetector,
    nav: EdgeDetector,
    settings: Settings,
    last_result: Option<SessionResult>,
}

impl Menu {
    pub fn new(catalog: Vec<GameDescriptor>, settings: Settings) -> Self {
        let options = catalog.iter().map(|g| g.label).collect();
        Self {
            catalog,
            state: MenuState::new(options),
            mode: Mode::Browsing,
            power_off_slot: None,
            confirm: EdgeDetector::new(),
            nav: EdgeDetector::new(),
            settings,
            last_result: None,
        }
    }

    /// Append a power-off entry after the games
    pub fn with_power_off(mut self) -> Self {
        self.power_off_slot = Some(self.state.options.len());
        self.state.options.push(POWER_OFF_LABEL);
        self
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    /// Label of the running session, if any
    pub fn active_session(&self) -> Option<&'static str> {
        match &self.mode {
            Mode::Browsing => None,
            Mode::Dispatched(session) => Some(session.label()),
        }
    }

    pub fn last_result(&self) -> Option<SessionResult> {
        self.last_result
    }

    /// One tick of the menu or of the running session
    pub fn step(&mut self, board: &mut Board) -> HwResult<MenuStatus> {
        if let Mode::Dispatched(session) = &mut self.mode {
            if let SessionStatus::Finished(result) = session.step(board)? {
                self.last_result = Some(result);
                self.mode = Mode::Browsing;
                board.clock.sleep_ms(self.settings.settle_ms);
            }
            return Ok(MenuStatus::Running);
        }

        board.present_frame(|display| self.state.render(display))?;

        let poll_ms = self.settings.release_poll_ms;
        if self
            .nav
            .poll(board.nav.as_mut(), board.clock.as_mut(), poll_ms)?
        {
            self.state.navigate();
            board.clock.sleep_ms(self.settings.settle_ms);
        }

        if self
            .confirm
            .poll(board.confirm.as_mut(), board.clock.as_mut(), poll_ms)?
        {
            if self.power_off_slot == Some(self.state.selected_index) {
                log::info!("Powering off");
                board.present_frame(|display| {
                    display.draw_text("Goodbye!", 40, 30, BinaryColor::On)
                })?;
                board.clock.sleep_ms(FAREWELL_MS);
                return Ok(MenuStatus::PowerOff);
            }

            if let Some(game) = self.catalog.get(self.state.selected_index) {
                let seed = self
                    .settings
                    .seed
                    .unwrap_or_else(|| board.clock.now_ms());
                log::info!("Launching {} (seed {})", game.label, seed);
                self.mode = Mode::Dispatched((game.factory)(&self.settings, seed));
            }
            board.clock.sleep_ms(self.settings.settle_ms);
        }

        Ok(MenuStatus::Running)
    }

    /// Run until power off, one step per tick
    pub fn run(&mut self, board: &mut Board) -> HwResult<()> {
        loop {
            if self.step(board)? == MenuStatus::PowerOff {
                return Ok(());
            }
            board.clock.sleep_ms(self.settings.tick_ms);
        }
    }
}
