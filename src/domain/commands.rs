// Per-turn intents accumulated by the control thread.

use super::status::StatusSnapshot;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color assignments requested this turn. `None` leaves the current color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorChanges {
    pub body: Option<Color>,
    pub gun: Option<Color>,
    pub radar: Option<Color>,
    pub bullet: Option<Color>,
    pub scan: Option<Color>,
}

/// A fire intent. Built by the proxy from the current status and never
/// changed afterwards; the engine decides whether it actually launches.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub heading: f64,
    pub x: f64,
    pub y: f64,
    pub power: f64,
    pub owner: Arc<str>,
}

/// Pending intents for the next turn.
///
/// Moved into the engine at turn advance; the engine hands back a fresh
/// baseline with the remaining values it has not yet consumed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionBuffer {
    /// Signed distance still to travel.
    pub distance_remaining: f64,
    pub body_turn_remaining: f64,
    pub gun_turn_remaining: f64,
    pub radar_turn_remaining: f64,
    pub moved: bool,
    pub scan: bool,
    pub colors: ColorChanges,
    pub projectiles: Vec<Projectile>,
}

impl ActionBuffer {
    /// Baseline for the following turn: keeps the unfinished deltas, drops
    /// everything that only applies once.
    pub fn carry_over(&self) -> Self {
        Self {
            distance_remaining: self.distance_remaining,
            body_turn_remaining: self.body_turn_remaining,
            gun_turn_remaining: self.gun_turn_remaining,
            radar_turn_remaining: self.radar_turn_remaining,
            ..Self::default()
        }
    }
}

/// What the engine returns for one consumed [`ActionBuffer`].
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub commands: ActionBuffer,
    pub status: StatusSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_buffer_is_carried_over_then_only_remaining_values_survive() {
        let buffer = ActionBuffer {
            distance_remaining: 40.0,
            body_turn_remaining: -1.0,
            gun_turn_remaining: 0.5,
            radar_turn_remaining: 2.0,
            moved: true,
            scan: true,
            colors: ColorChanges {
                body: Some(Color::rgb(255, 0, 0)),
                ..Default::default()
            },
            projectiles: vec![Projectile {
                id: 1,
                heading: 0.0,
                x: 10.0,
                y: 10.0,
                power: 1.0,
                owner: Arc::from("alpha"),
            }],
        };

        let next = buffer.carry_over();

        assert_eq!(next.distance_remaining, 40.0);
        assert_eq!(next.body_turn_remaining, -1.0);
        assert_eq!(next.gun_turn_remaining, 0.5);
        assert_eq!(next.radar_turn_remaining, 2.0);
        assert!(!next.moved);
        assert!(!next.scan);
        assert_eq!(next.colors, ColorChanges::default());
        assert!(next.projectiles.is_empty());
    }
}
