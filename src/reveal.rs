//! Center-outward staggered reveal of the overlay cells.

use crate::constants::{
    REVEAL_BACK_OVERSHOOT, REVEAL_DURATION, REVEAL_INITIAL_DELAY, REVEAL_STAGGER,
    REVEAL_START_SCALE,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Emission order for `n` cells: mid, mid-1, mid+1, mid-2, mid+2, ...
/// with `mid = n / 2`. Always a permutation of `0..n`.
pub fn wave_order(n: usize) -> Vec<usize> {
    let mid = n / 2;
    let mut order = Vec::with_capacity(n);
    for i in 0..n {
        let left = mid.checked_sub(i);
        if let Some(left) = left {
            order.push(left);
        }
        let right = mid + i;
        if right < n && Some(right) != left {
            order.push(right);
        }
    }
    order
}

/// `back.out` easing: overshoots past 1 and settles back.
fn ease_back_out(t: f32) -> f32 {
    let q = t - 1.0;
    q * q * ((REVEAL_BACK_OVERSHOOT + 1.0) * q + REVEAL_BACK_OVERSHOOT) + 1.0
}

/// Whether the "already animated" latch survives closing the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Every overlay open plays the wave again.
    #[default]
    PerSession,
    /// The wave plays on the first open only.
    Once,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    Closed,
    Animating,
    Settled,
}

/// Visual state of one cell at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellReveal {
    pub scale: f32,
    pub opacity: f32,
}

impl CellReveal {
    pub const HIDDEN: CellReveal = CellReveal {
        scale: REVEAL_START_SCALE,
        opacity: 0.0,
    };
    pub const SHOWN: CellReveal = CellReveal {
        scale: 1.0,
        opacity: 1.0,
    };

    fn at(progress: f32) -> Self {
        let eased = ease_back_out(progress.clamp(0.0, 1.0));
        CellReveal {
            scale: REVEAL_START_SCALE + (1.0 - REVEAL_START_SCALE) * eased,
            opacity: eased.clamp(0.0, 1.0),
        }
    }
}

/// Drives the reveal wave once per overlay session.
///
/// Closed -> Animating on open, Animating -> Settled when the last cell
/// finishes, Settled or Animating -> Closed on close. The wave covers the
/// cells materialized on the first frame after opening.
#[derive(Debug)]
pub struct RevealSequencer {
    mode: RevealMode,
    phase: RevealPhase,
    played: bool,
    wave: Option<Wave>,
}

#[derive(Debug)]
struct Wave {
    started_at: f64,
    /// Catalog index -> position in the emission order.
    slots: HashMap<usize, usize>,
}

impl Wave {
    fn end_time(&self) -> f64 {
        match self.slots.len() {
            0 => self.started_at,
            n => self.started_at + delay_for(n - 1) + REVEAL_DURATION,
        }
    }
}

/// Start offset of the cell at `position` in the emission order, in seconds.
pub fn delay_for(position: usize) -> f64 {
    REVEAL_INITIAL_DELAY + position as f64 * REVEAL_STAGGER
}

impl RevealSequencer {
    pub fn new(mode: RevealMode) -> Self {
        Self {
            mode,
            phase: RevealPhase::Closed,
            played: false,
            wave: None,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn open(&mut self) {
        if self.phase != RevealPhase::Closed {
            return;
        }
        self.wave = None;
        self.phase = if self.played {
            RevealPhase::Settled
        } else {
            RevealPhase::Animating
        };
    }

    /// Abandons any in-flight wave. In per-session mode the next open plays again.
    pub fn close(&mut self) {
        self.phase = RevealPhase::Closed;
        self.wave = None;
        if self.mode == RevealMode::PerSession {
            self.played = false;
        }
    }

    /// Advances the sequencer for this frame. `materialized` lists the catalog
    /// indices currently on screen; it is captured once, on the first frame of
    /// the session. Returns true while the wave is still running.
    pub fn update(&mut self, materialized: &[usize], now: f64) -> bool {
        if self.phase != RevealPhase::Animating {
            return false;
        }
        let wave = self.wave.get_or_insert_with(|| Wave {
            started_at: now,
            slots: wave_order(materialized.len())
                .into_iter()
                .enumerate()
                .map(|(position, local)| (materialized[local], position))
                .collect(),
        });
        if now >= wave.end_time() {
            log::debug!("Reveal wave settled after {} cells", wave.slots.len());
            self.phase = RevealPhase::Settled;
            self.played = true;
            return false;
        }
        true
    }

    /// How a cell should be drawn at `now`.
    pub fn cell(&self, index: usize, now: f64) -> CellReveal {
        match self.phase {
            RevealPhase::Closed => CellReveal::HIDDEN,
            RevealPhase::Settled => CellReveal::SHOWN,
            RevealPhase::Animating => {
                let Some(wave) = &self.wave else {
                    return CellReveal::HIDDEN;
                };
                match wave.slots.get(&index) {
                    Some(&position) => {
                        let elapsed = now - wave.started_at - delay_for(position);
                        CellReveal::at((elapsed / REVEAL_DURATION) as f32)
                    }
                    None => CellReveal::SHOWN,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_order_small_cases() {
        assert_eq!(wave_order(0), Vec::<usize>::new());
        assert_eq!(wave_order(1), vec![0]);
        assert_eq!(wave_order(2), vec![1, 0]);
        assert_eq!(wave_order(4), vec![2, 1, 3, 0]);
        assert_eq!(wave_order(5), vec![2, 1, 3, 0, 4]);
    }

    #[test]
    fn test_wave_order_is_permutation() {
        for n in 0..64 {
            let mut order = wave_order(n);
            assert_eq!(order.len(), n);
            order.sort_unstable();
            assert_eq!(order, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_easing_endpoints() {
        assert!(ease_back_out(0.0).abs() < 1e-6);
        assert!((ease_back_out(1.0) - 1.0).abs() < 1e-6);
        assert!(ease_back_out(0.6) > 1.0);
        assert_eq!(CellReveal::at(1.0), CellReveal::SHOWN);
        assert_eq!(CellReveal::at(-3.0).opacity, 0.0);
    }

    #[test]
    fn test_session_lifecycle() {
        let mut reveal = RevealSequencer::new(RevealMode::PerSession);
        assert_eq!(reveal.phase(), RevealPhase::Closed);

        reveal.open();
        assert_eq!(reveal.phase(), RevealPhase::Animating);
        let cells = [10, 11, 12, 13, 14];
        assert!(reveal.update(&cells, 100.0));

        // Index 12 is the middle and goes first; 14 is last.
        let middle = reveal.cell(12, 100.0 + delay_for(0) + REVEAL_DURATION);
        assert_eq!(middle, CellReveal::SHOWN);
        assert_eq!(reveal.cell(14, 100.0 + delay_for(4)), CellReveal::HIDDEN);
        // Cells outside the captured wave are shown as-is.
        assert_eq!(reveal.cell(99, 100.0), CellReveal::SHOWN);

        // Later frames with more cells do not restart the wave.
        assert!(reveal.update(&[9, 10, 11, 12, 13, 14, 15], 100.2));
        let end = 100.0 + delay_for(4) + REVEAL_DURATION;
        assert!(!reveal.update(&cells, end));
        assert_eq!(reveal.phase(), RevealPhase::Settled);
        assert_eq!(reveal.cell(14, end), CellReveal::SHOWN);

        reveal.close();
        assert_eq!(reveal.phase(), RevealPhase::Closed);
        reveal.open();
        assert_eq!(reveal.phase(), RevealPhase::Animating);
    }

    #[test]
    fn test_close_mid_animation_replays_next_time() {
        let mut reveal = RevealSequencer::new(RevealMode::PerSession);
        reveal.open();
        assert!(reveal.update(&[0, 1, 2], 5.0));
        reveal.close();
        assert_eq!(reveal.phase(), RevealPhase::Closed);

        reveal.open();
        assert!(reveal.update(&[0, 1, 2], 50.0));
        assert_eq!(reveal.cell(1, 50.0), CellReveal::HIDDEN);
    }

    #[test]
    fn test_once_mode_keeps_latch_across_sessions() {
        let mut reveal = RevealSequencer::new(RevealMode::Once);
        reveal.open();
        reveal.update(&[0, 1], 0.0);
        assert!(!reveal.update(&[0, 1], 10.0));
        reveal.close();

        reveal.open();
        assert_eq!(reveal.phase(), RevealPhase::Settled);
        assert!(!reveal.update(&[0, 1], 20.0));
        assert_eq!(reveal.cell(0, 20.0), CellReveal::SHOWN);
    }

    #[test]
    fn test_empty_overlay_settles_immediately() {
        let mut reveal = RevealSequencer::new(RevealMode::PerSession);
        reveal.open();
        assert!(!reveal.update(&[], 1.0));
        assert_eq!(reveal.phase(), RevealPhase::Settled);
    }
}
