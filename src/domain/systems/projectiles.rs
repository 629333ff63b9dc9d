use crate::domain::events::WorldEvent;
use crate::domain::math::normal_relative_angle;
use crate::domain::state::{SimProjectile, SimRobot};
use crate::domain::status::BattleRules;
use crate::domain::tuning::projectile::ProjectileTuning;
use std::sync::Arc;
use tracing::info;

// Heat below this is treated as a cold gun.
const HEAT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct ProjectileConfig {
    pub tuning: ProjectileTuning,
    pub robot_radius: f64,
}

/// Launches, moves and resolves projectiles for one turn.
///
/// Returns the events raised, addressed by robot id.
pub fn tick_projectiles(
    robots: &mut [SimRobot],
    projectiles: &mut Vec<SimProjectile>,
    rules: &BattleRules,
    cfg: ProjectileConfig,
) -> Vec<(u64, WorldEvent)> {
    let mut events = Vec::new();

    // Launch at most one projectile per robot, from a cold gun only.
    for r in robots.iter_mut() {
        if !r.alive {
            continue;
        }

        let intents = std::mem::take(&mut r.commands.projectiles);
        let launch = intents
            .into_iter()
            .next()
            .filter(|_| r.gun_heat <= 0.0 && r.energy > 0.0);

        match launch {
            Some(intent) => {
                let power = intent
                    .power
                    .clamp(cfg.tuning.min_power, cfg.tuning.max_power)
                    .min(r.energy);
                r.energy -= power;
                r.gun_heat = cfg.tuning.heat(power);
                projectiles.push(SimProjectile {
                    id: intent.id,
                    owner_id: r.id,
                    owner_name: Arc::clone(&r.name),
                    x: r.x,
                    y: r.y,
                    heading: intent.heading,
                    power,
                    speed: cfg.tuning.speed(power),
                    active: true,
                });
            }
            None => {
                r.gun_heat = (r.gun_heat - rules.gun_cooling_rate).max(0.0);
                if r.gun_heat < HEAT_EPSILON {
                    r.gun_heat = 0.0;
                }
            }
        }
    }

    for p in projectiles.iter_mut() {
        p.x += p.heading.sin() * p.speed;
        p.y += p.heading.cos() * p.speed;
    }

    // Naive O(P*R) hit test; projectiles are few.
    let hit_radius_sq = cfg.robot_radius * cfg.robot_radius;
    for p in projectiles.iter_mut() {
        let outside = p.x < 0.0
            || p.y < 0.0
            || p.x > rules.battlefield_width
            || p.y > rules.battlefield_height;
        if outside {
            p.active = false;
            events.push((
                p.owner_id,
                WorldEvent::BulletMissed {
                    projectile_id: p.id,
                },
            ));
            continue;
        }

        let Some(victim) = robots.iter_mut().find(|r| {
            let (dx, dy) = (r.x - p.x, r.y - p.y);
            r.alive && r.id != p.owner_id && dx * dx + dy * dy <= hit_radius_sq
        }) else {
            continue;
        };

        victim.energy -= cfg.tuning.damage(p.power);
        let bearing = normal_relative_angle(p.heading + std::f64::consts::PI - victim.body_heading);
        let victim_id = victim.id;
        let victim_name = Arc::clone(&victim.name);
        let victim_energy = victim.energy.max(0.0);

        info!(
            victim = %victim_name,
            shooter = %p.owner_name,
            projectile_id = p.id,
            victim_energy,
            "robot hit"
        );

        events.push((
            victim_id,
            WorldEvent::HitByBullet {
                shooter: Arc::clone(&p.owner_name),
                power: p.power,
                bearing,
            },
        ));
        events.push((
            p.owner_id,
            WorldEvent::BulletHit {
                projectile_id: p.id,
                victim: victim_name,
                victim_energy,
            },
        ));
        if let Some(shooter) = robots.iter_mut().find(|r| r.id == p.owner_id && r.alive) {
            shooter.energy += cfg.tuning.reward(p.power);
        }
        p.active = false;
    }

    projectiles.retain(|p| p.active);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::Projectile;

    fn cfg() -> ProjectileConfig {
        ProjectileConfig {
            tuning: ProjectileTuning::default(),
            robot_radius: 18.0,
        }
    }

    fn robot(id: u64, name: &str, x: f64, y: f64) -> SimRobot {
        SimRobot::new(id, Arc::from(name), x, y, 100.0, 0.0)
    }

    fn intent(owner: &str, x: f64, y: f64, power: f64) -> Projectile {
        Projectile {
            id: 7,
            heading: 0.0,
            x,
            y,
            power,
            owner: Arc::from(owner),
        }
    }

    #[test]
    fn when_gun_is_cold_then_projectile_launches_and_heats_gun() {
        let mut robots = vec![robot(1, "alpha", 400.0, 100.0)];
        robots[0].commands.projectiles.push(intent("alpha", 400.0, 100.0, 2.0));
        let mut projectiles = Vec::new();

        tick_projectiles(&mut robots, &mut projectiles, &BattleRules::default(), cfg());

        assert_eq!(projectiles.len(), 1);
        assert_eq!(robots[0].energy, 98.0);
        assert!((robots[0].gun_heat - 1.4).abs() < 1e-9);
        assert!(robots[0].commands.projectiles.is_empty());
    }

    #[test]
    fn when_gun_is_hot_then_intent_is_dropped_and_gun_cools() {
        let mut robots = vec![robot(1, "alpha", 400.0, 100.0)];
        robots[0].gun_heat = 0.5;
        robots[0].commands.projectiles.push(intent("alpha", 400.0, 100.0, 2.0));
        let mut projectiles = Vec::new();

        tick_projectiles(&mut robots, &mut projectiles, &BattleRules::default(), cfg());

        assert!(projectiles.is_empty());
        assert!((robots[0].gun_heat - 0.4).abs() < 1e-9);
        assert_eq!(robots[0].energy, 100.0);
    }

    #[test]
    fn when_projectile_reaches_other_robot_then_both_sides_get_events() {
        let mut robots = vec![robot(1, "alpha", 400.0, 100.0), robot(2, "beta", 400.0, 115.0)];
        robots[0].commands.projectiles.push(intent("alpha", 400.0, 100.0, 1.0));
        let mut projectiles = Vec::new();

        let events = tick_projectiles(&mut robots, &mut projectiles, &BattleRules::default(), cfg());

        assert!(projectiles.is_empty());
        assert_eq!(robots[1].energy, 96.0);
        assert_eq!(robots[0].energy, 102.0);
        assert!(events.iter().any(|(id, e)| *id == 2 && matches!(e, WorldEvent::HitByBullet { .. })));
        assert!(events.iter().any(|(id, e)| *id == 1 && matches!(e, WorldEvent::BulletHit { .. })));
    }

    #[test]
    fn when_projectile_leaves_field_then_owner_gets_missed_event() {
        let mut robots = vec![robot(1, "alpha", 400.0, 590.0)];
        robots[0].commands.projectiles.push(intent("alpha", 400.0, 590.0, 0.1));
        let mut projectiles = Vec::new();

        let events = tick_projectiles(&mut robots, &mut projectiles, &BattleRules::default(), cfg());

        assert!(projectiles.is_empty());
        assert_eq!(
            events,
            vec![(1, WorldEvent::BulletMissed { projectile_id: 7 })]
        );
    }
}
