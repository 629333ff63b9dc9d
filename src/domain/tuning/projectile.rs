/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    pub min_power: f64,
    pub max_power: f64,

    /// Speed of a zero-power projectile in units per turn.
    pub base_speed: f64,

    /// Speed lost per unit of power.
    pub speed_per_power: f64,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            min_power: 0.1,
            max_power: 3.0,
            base_speed: 20.0,
            speed_per_power: 3.0,
        }
    }
}

impl ProjectileTuning {
    pub fn speed(&self, power: f64) -> f64 {
        self.base_speed - self.speed_per_power * power
    }

    /// Energy taken from the victim.
    pub fn damage(&self, power: f64) -> f64 {
        let bonus = if power > 1.0 { 2.0 * (power - 1.0) } else { 0.0 };
        4.0 * power + bonus
    }

    /// Energy returned to the shooter on a hit.
    pub fn reward(&self, power: f64) -> f64 {
        3.0 * power
    }

    /// Gun heat produced by firing.
    pub fn heat(&self, power: f64) -> f64 {
        1.0 + power / 5.0
    }
}
