// Engine-produced view of one agent after a turn.

use std::sync::Arc;

/// Static rules of the battle, shared by every snapshot of a match.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleRules {
    pub battlefield_width: f64,
    pub battlefield_height: f64,
    /// Gun heat removed per turn.
    pub gun_cooling_rate: f64,
    pub num_rounds: u32,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            battlefield_width: 800.0,
            battlefield_height: 600.0,
            gun_cooling_rate: 0.1,
            num_rounds: 1,
        }
    }
}

/// State of one agent as resolved by the engine at the end of a turn.
///
/// Snapshots are never patched in place; the proxy swaps in a new one after
/// every turn. Headings are in radians, normalized to `[0, 2π)`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub x: f64,
    pub y: f64,
    pub body_heading: f64,
    pub gun_heading: f64,
    pub radar_heading: f64,
    pub velocity: f64,
    pub energy: f64,
    pub gun_heat: f64,
    /// Turns elapsed in the current round.
    pub time: u64,
    pub round_num: u32,
    /// Other agents still alive.
    pub others: u32,
    pub rules: Arc<BattleRules>,
}

impl StatusSnapshot {
    /// Snapshot at rest at the given position, used for the first turn of a round.
    pub fn spawn(x: f64, y: f64, energy: f64, rules: Arc<BattleRules>) -> Self {
        Self {
            x,
            y,
            body_heading: 0.0,
            gun_heading: 0.0,
            radar_heading: 0.0,
            velocity: 0.0,
            energy,
            gun_heat: 3.0,
            time: 0,
            round_num: 0,
            others: 0,
            rules,
        }
    }
}
