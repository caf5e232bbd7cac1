//! Per-game session state machine
//!
//! Every game runs through the same phases:
//! - `Playing`: one read-update-render-audio cycle per step
//! - `GameOverPending`: game-over screen and cue, played once
//! - `AwaitingRestart`: restart prompt, polled once per step
//! - `Exited`: the session is over and reports its result
//!
//! The game itself only supplies the capabilities in [`Game`].

use crate::audio::{AudioManager, SoundEffect};
use crate::error::HwResult;
use crate::platform::{Board, DisplayDriver, EdgeDetector};
use crate::settings::Settings;
use crate::sim::{GameEvent, SteeringFilter, TickInput};

/// What a button does while a game is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Fire,
    Exit,
    Unused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub confirm: ButtonRole,
    pub nav: ButtonRole,
}

/// Capabilities a game plugs into the session machine
pub trait Game {
    fn label(&self) -> &'static str;
    /// Back to the state of a fresh run
    fn reset(&mut self);
    fn advance(&mut self, input: &TickInput) -> Vec<GameEvent>;
    /// True once the run has ended (collision, breach)
    fn check_terminal(&self) -> bool;
    fn render(&self, display: &mut dyn DisplayDriver) -> HwResult<()>;
    fn render_game_over(&self, display: &mut dyn DisplayDriver) -> HwResult<()>;
    fn game_over_cue(&self) -> SoundEffect;
    fn final_score(&self) -> u32;
    fn bindings(&self) -> Bindings;

    /// Sound for something that happened during a tick
    fn cue(&self, event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::ShotFired { .. } => Some(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::EnemyHit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Playing,
    GameOverPending,
    AwaitingRestart,
    Exited,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// The run ended in a crash or breach and the player left the prompt
    Collision,
    /// The player quit mid-run
    PlayerExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub final_score: u32,
    pub cause: EndCause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Finished(SessionResult),
}

/// A running game as seen by the menu
pub trait Session {
    fn label(&self) -> &'static str;
    fn phase(&self) -> SessionPhase;
    /// Advance by one tick; hardware faults propagate
    fn step(&mut self, board: &mut Board) -> HwResult<SessionStatus>;
}

/// Drives one `Game` through its phases
pub struct GameSession<G: Game> {
    game: G,
    phase: SessionPhase,
    filter: SteeringFilter,
    confirm: EdgeDetector,
    nav: EdgeDetector,
    audio: AudioManager,
    settings: Settings,
    result: Option<SessionResult>,
}

impl<G: Game> GameSession<G> {
    pub fn new(game: G, settings: &Settings) -> Self {
        log::info!("Starting {}", game.label());
        Self {
            game,
            phase: SessionPhase::Playing,
            filter: SteeringFilter::new(settings.smoothing),
            confirm: EdgeDetector::new(),
            nav: EdgeDetector::new(),
            audio: AudioManager::from_settings(settings),
            settings: settings.clone(),
            result: None,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    fn finish(&mut self, cause: EndCause) -> SessionStatus {
        let result = SessionResult {
            final_score: self.game.final_score(),
            cause,
        };
        log::info!(
            "{} finished: {:?}, score {}",
            self.game.label(),
            cause,
            result.final_score
        );
        self.phase = SessionPhase::Exited;
        self.result = Some(result);
        SessionStatus::Finished(result)
    }

    /// Edge on the button bound to `role`, if any
    fn poll_role(&mut self, board: &mut Board, role: ButtonRole) -> HwResult<bool> {
        let bindings = self.game.bindings();
        let poll_ms = self.settings.release_poll_ms;
        let mut seen = false;
        if bindings.confirm == role {
            seen |= self
                .confirm
                .poll(board.confirm.as_mut(), board.clock.as_mut(), poll_ms)?;
        }
        if bindings.nav == role {
            seen |= self
                .nav
                .poll(board.nav.as_mut(), board.clock.as_mut(), poll_ms)?;
        }
        Ok(seen)
    }

    fn play(&mut self, board: &mut Board) -> HwResult<SessionStatus> {
        if self.poll_role(board, ButtonRole::Exit)? {
            return Ok(self.finish(EndCause::PlayerExit));
        }
        let fire = self.poll_role(board, ButtonRole::Fire)?;

        let raw = board.sensor.read_axis()?;
        let input = TickInput {
            steering: self.filter.update(raw),
            now_ms: board.clock.now_ms(),
            fire,
        };

        let events = self.game.advance(&input);
        board.present_frame(|display| self.game.render(display))?;

        for event in &events {
            if let Some(effect) = self.game.cue(event) {
                self.audio
                    .play(effect, board.tone.as_mut(), board.clock.as_mut())?;
            }
        }

        if self.game.check_terminal() {
            self.phase = SessionPhase::GameOverPending;
        }
        Ok(SessionStatus::Running)
    }

    fn game_over(&mut self, board: &mut Board) -> HwResult<SessionStatus> {
        log::info!(
            "{} game over, score {}",
            self.game.label(),
            self.game.final_score()
        );
        board.present_frame(|display| self.game.render_game_over(display))?;
        self.audio.play(
            self.game.game_over_cue(),
            board.tone.as_mut(),
            board.clock.as_mut(),
        )?;

        // A button still held from play must not answer the prompt
        self.confirm.disarm();
        self.nav.disarm();
        self.phase = SessionPhase::AwaitingRestart;
        Ok(SessionStatus::Running)
    }

    fn prompt(&mut self, board: &mut Board) -> HwResult<SessionStatus> {
        let poll_ms = self.settings.release_poll_ms;
        if self
            .confirm
            .poll(board.confirm.as_mut(), board.clock.as_mut(), poll_ms)?
        {
            if !self.settings.restart_after_game_over {
                return Ok(self.finish(EndCause::Collision));
            }
            log::info!("Restarting {}", self.game.label());
            self.game.reset();
            self.phase = SessionPhase::Playing;
            return Ok(SessionStatus::Running);
        }
        if self
            .nav
            .poll(board.nav.as_mut(), board.clock.as_mut(), poll_ms)?
        {
            return Ok(self.finish(EndCause::Collision));
        }
        Ok(SessionStatus::Running)
    }
}

impl<G: Game> Session for GameSession<G> {
    fn label(&self) -> &'static str {
        self.game.label()
    }

    fn phase(&self) -> SessionPhase {
        self.phase
    }

    fn step(&mut self, board: &mut Board) -> HwResult<SessionStatus> {
        match self.phase {
            SessionPhase::Playing => self.play(board),
            SessionPhase::GameOverPending => self.game_over(board),
            SessionPhase::AwaitingRestart => self.prompt(board),
            SessionPhase::Exited => Ok(match self.result {
                Some(result) => SessionStatus::Finished(result),
                None => self.finish(EndCause::PlayerExit),
            }),
        }
    }
}
