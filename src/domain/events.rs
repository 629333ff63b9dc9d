// World events the engine queues for an agent between turns.

use std::sync::Arc;

/// Bearings are relative to the receiving agent's body heading, in radians.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    HitWall {
        bearing: f64,
    },
    HitByBullet {
        shooter: Arc<str>,
        power: f64,
        bearing: f64,
    },
    BulletHit {
        projectile_id: u64,
        victim: Arc<str>,
        victim_energy: f64,
    },
    BulletMissed {
        projectile_id: u64,
    },
    ScannedRobot {
        name: Arc<str>,
        distance: f64,
        bearing: f64,
        heading: f64,
        velocity: f64,
        energy: f64,
    },
    RobotDeath {
        name: Arc<str>,
    },
    /// A registered custom condition tested true at the turn boundary.
    Custom {
        name: String,
    },
}
