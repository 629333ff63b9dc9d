use crate::domain::math::{normal_absolute_angle, step_toward_zero};
use crate::domain::state::SimRobot;
use crate::domain::status::BattleRules;
use crate::domain::tuning::robot::RobotTuning;

/// What happened to a robot's body during one turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    pub hit_wall: bool,
    /// Radar heading before and after this turn's rotation.
    pub radar_sweep: (f64, f64),
}

/// Works one turn off the robot's remaining turn and distance values.
pub fn tick_robot(r: &mut SimRobot, tuning: &RobotTuning, rules: &BattleRules) -> MotionOutcome {
    let disabled = r.energy <= 0.0;
    let c = &mut r.commands;

    // Body rotation is limited by current speed; a disabled robot keeps still.
    if disabled {
        c.body_turn_remaining = 0.0;
        c.distance_remaining = 0.0;
    }
    let body_step = step_toward_zero(c.body_turn_remaining, tuning.body_turn_rate(r.velocity));
    r.body_heading = normal_absolute_angle(r.body_heading + body_step);
    c.body_turn_remaining -= body_step;

    let gun_step = step_toward_zero(c.gun_turn_remaining, tuning.max_gun_turn_rate.to_radians());
    r.gun_heading = normal_absolute_angle(r.gun_heading + gun_step);
    c.gun_turn_remaining -= gun_step;

    let radar_start = r.radar_heading;
    let radar_step = step_toward_zero(
        c.radar_turn_remaining,
        tuning.max_radar_turn_rate.to_radians(),
    );
    r.radar_heading = normal_absolute_angle(r.radar_heading + radar_step);
    c.radar_turn_remaining -= radar_step;

    // 0 rad faces +Y; positive headings turn clockwise.
    let step = step_toward_zero(c.distance_remaining, tuning.max_velocity);
    r.velocity = step;
    r.x += r.body_heading.sin() * step;
    r.y += r.body_heading.cos() * step;
    c.distance_remaining -= step;

    let hit_wall = clamp_to_field(r, tuning.radius, rules);

    MotionOutcome {
        hit_wall,
        radar_sweep: (radar_start, r.radar_heading),
    }
}

fn clamp_to_field(r: &mut SimRobot, radius: f64, rules: &BattleRules) -> bool {
    let (min_x, max_x) = (radius, rules.battlefield_width - radius);
    let (min_y, max_y) = (radius, rules.battlefield_height - radius);

    let x = r.x.clamp(min_x, max_x);
    let y = r.y.clamp(min_y, max_y);
    if x == r.x && y == r.y {
        return false;
    }

    // A wall stops the robot and cancels what was left of the move.
    r.x = x;
    r.y = y;
    r.velocity = 0.0;
    r.commands.distance_remaining = 0.0;
    true
}
