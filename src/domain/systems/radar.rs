use crate::domain::events::WorldEvent;
use crate::domain::math::normal_relative_angle;
use crate::domain::state::SimRobot;
use std::sync::Arc;

// Half-width of the beam when the radar did not rotate this turn.
const MIN_BEAM: f64 = 0.5 * std::f64::consts::PI / 180.0;

/// Reports every live robot inside the arc swept by `scanner`'s radar.
pub fn scan(scanner: &SimRobot, sweep: (f64, f64), robots: &[SimRobot], range: f64) -> Vec<WorldEvent> {
    let (start, end) = sweep;
    let arc = normal_relative_angle(end - start);
    let (lo, hi) = if arc >= 0.0 {
        (-MIN_BEAM, arc + MIN_BEAM)
    } else {
        (arc - MIN_BEAM, MIN_BEAM)
    };

    robots
        .iter()
        .filter(|r| r.alive && r.id != scanner.id)
        .filter_map(|r| {
            let (dx, dy) = (r.x - scanner.x, r.y - scanner.y);
            let distance = dx.hypot(dy);
            if distance > range {
                return None;
            }
            let absolute = dx.atan2(dy);
            let offset = normal_relative_angle(absolute - start);
            if offset < lo || offset > hi {
                return None;
            }
            Some(WorldEvent::ScannedRobot {
                name: Arc::clone(&r.name),
                distance,
                bearing: normal_relative_angle(absolute - scanner.body_heading),
                heading: r.body_heading,
                velocity: r.velocity,
                energy: r.energy,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn robot(id: u64, name: &str, x: f64, y: f64) -> SimRobot {
        SimRobot::new(id, Arc::from(name), x, y, 100.0, 0.0)
    }

    #[test]
    fn when_target_is_inside_swept_arc_then_it_is_reported() {
        let scanner = robot(1, "alpha", 100.0, 100.0);
        // Due east of the scanner.
        let robots = vec![robot(2, "beta", 300.0, 100.0)];

        let events = scan(&scanner, (0.0, FRAC_PI_2 + 0.1), &robots, 1200.0);

        assert_eq!(events.len(), 1);
        match &events[0] {
            WorldEvent::ScannedRobot { name, distance, bearing, .. } => {
                assert_eq!(name.as_ref(), "beta");
                assert!((distance - 200.0).abs() < 1e-9);
                assert!((bearing - FRAC_PI_2).abs() < 1e-9);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn when_target_is_behind_the_sweep_then_nothing_is_reported() {
        let scanner = robot(1, "alpha", 100.0, 100.0);
        // Due west.
        let robots = vec![robot(2, "beta", 10.0, 100.0)];

        let events = scan(&scanner, (0.0, FRAC_PI_2), &robots, 1200.0);

        assert!(events.is_empty());
    }
}
