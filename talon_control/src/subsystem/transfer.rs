//! Transfer (feeder) proxy and game-piece sensing.

use std::time::Duration;

use crate::subsystem::sim::SimHandle;

/// Feeder between intake and shooter, with the game-piece beam break.
pub trait Transfer {
    /// Feeder duty cycle; positive moves the piece toward the shooter.
    fn set_feeder_speed(&mut self, speed: f64);
    fn feeder_speed(&self) -> f64;
    /// A game piece is held in the transfer.
    fn is_game_piece_stored(&self) -> bool;
    /// Latched "just collected" flag, cleared by the caller.
    fn is_game_piece_collected(&self) -> bool;
    fn set_game_piece_collected(&mut self, collected: bool);
    fn periodic(&mut self, _dt: Duration) {}
}

// ─── Simulation ─────────────────────────────────────────────────────

/// Beam-break model. With `transit_cycles` set, running the feeder forward
/// for that many consecutive cycles moves a piece in (when one is waiting at
/// the intake) or out (when one is stored). Without it, tests set `stored`
/// directly.
#[derive(Debug, Clone, Default)]
pub struct TransferModel {
    pub feeder_speed: f64,
    pub stored: bool,
    pub collected: bool,
    pub piece_at_intake: bool,
    pub transit_cycles: Option<u32>,
    pub feed_counter: u32,
    pub pieces_shot: u32,
}

pub type SimTransfer = SimHandle<TransferModel>;

impl Transfer for SimHandle<TransferModel> {
    fn set_feeder_speed(&mut self, speed: f64) {
        self.model_mut().feeder_speed = speed.clamp(-1.0, 1.0);
    }

    fn feeder_speed(&self) -> f64 {
        self.model().feeder_speed
    }

    fn is_game_piece_stored(&self) -> bool {
        self.model().stored
    }

    fn is_game_piece_collected(&self) -> bool {
        self.model().collected
    }

    fn set_game_piece_collected(&mut self, collected: bool) {
        self.model_mut().collected = collected;
    }

    fn periodic(&mut self, _dt: Duration) {
        let mut m = self.model_mut();
        let Some(transit) = m.transit_cycles else {
            return;
        };
        let moving_piece = m.stored || m.piece_at_intake;
        if m.feeder_speed <= 0.0 || !moving_piece {
            m.feed_counter = 0;
            return;
        }
        m.feed_counter += 1;
        if m.feed_counter < transit {
            return;
        }
        m.feed_counter = 0;
        if m.stored {
            m.stored = false;
            m.pieces_shot += 1;
        } else {
            m.stored = true;
            m.piece_at_intake = false;
        }
    }
}
