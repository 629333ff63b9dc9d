// Engine-side simulation entities and per-turn report types.

use crate::domain::commands::ActionBuffer;
use crate::domain::status::{BattleRules, StatusSnapshot};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RobotReport {
    pub id: u64,
    pub name: Arc<str>,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub energy: f64,
}

#[derive(Debug, Clone)]
pub struct ProjectileReport {
    pub id: u64,
    pub owner_id: u64,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

pub struct SimRobot {
    pub id: u64,
    pub name: Arc<str>,
    pub x: f64,
    pub y: f64,
    pub body_heading: f64,
    pub gun_heading: f64,
    pub radar_heading: f64,
    pub velocity: f64,
    pub energy: f64,
    pub gun_heat: f64,
    pub alive: bool,

    // Intents being worked off; replaced whenever the agent submits a turn.
    pub commands: ActionBuffer,
}

impl SimRobot {
    pub fn new(id: u64, name: Arc<str>, x: f64, y: f64, energy: f64, gun_heat: f64) -> Self {
        Self {
            id,
            name,
            x,
            y,
            body_heading: 0.0,
            gun_heading: 0.0,
            radar_heading: 0.0,
            velocity: 0.0,
            energy,
            gun_heat,
            alive: true,
            commands: ActionBuffer::default(),
        }
    }

    pub fn snapshot(&self, time: u64, others: u32, rules: &Arc<BattleRules>) -> StatusSnapshot {
        StatusSnapshot {
            x: self.x,
            y: self.y,
            body_heading: self.body_heading,
            gun_heading: self.gun_heading,
            radar_heading: self.radar_heading,
            velocity: self.velocity,
            energy: self.energy,
            gun_heat: self.gun_heat,
            time,
            round_num: 0,
            others,
            rules: Arc::clone(rules),
        }
    }
}

pub struct SimProjectile {
    pub id: u64,
    pub owner_id: u64,
    pub owner_name: Arc<str>,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub power: f64,
    pub speed: f64,
    pub active: bool,
}

impl From<&SimRobot> for RobotReport {
    fn from(r: &SimRobot) -> Self {
        Self {
            id: r.id,
            name: Arc::clone(&r.name),
            x: r.x,
            y: r.y,
            heading: r.body_heading,
            energy: r.energy,
        }
    }
}

impl From<&SimProjectile> for ProjectileReport {
    fn from(p: &SimProjectile) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            x: p.x,
            y: p.y,
            heading: p.heading,
        }
    }
}
