/// Physical limits of a robot body in the reference engine.
///
/// Angular limits are in degrees per turn, distances in field units.
#[derive(Debug, Clone, Copy)]
pub struct RobotTuning {
    /// Fastest a robot covers ground in one turn.
    pub max_velocity: f64,

    /// Body rotation at rest.
    pub max_body_turn_rate: f64,

    /// Body rotation lost per unit of velocity.
    pub body_turn_velocity_penalty: f64,

    pub max_gun_turn_rate: f64,

    pub max_radar_turn_rate: f64,

    /// Collision radius against walls and projectiles.
    pub radius: f64,

    pub start_energy: f64,

    /// Gun heat at spawn; robots cannot fire in the first turns of a round.
    pub start_gun_heat: f64,

    /// Farthest distance the radar reports.
    pub radar_range: f64,
}

impl Default for RobotTuning {
    fn default() -> Self {
        Self {
            max_velocity: 8.0,
            max_body_turn_rate: 10.0,
            body_turn_velocity_penalty: 0.75,
            max_gun_turn_rate: 20.0,
            max_radar_turn_rate: 45.0,
            radius: 18.0,
            start_energy: 100.0,
            start_gun_heat: 3.0,
            radar_range: 1200.0,
        }
    }
}

impl RobotTuning {
    /// Body turn limit in radians for the given velocity.
    pub fn body_turn_rate(&self, velocity: f64) -> f64 {
        (self.max_body_turn_rate - self.body_turn_velocity_penalty * velocity.abs()).to_radians()
    }
}
