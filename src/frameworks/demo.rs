// Sample agent driven by the binary: patrols in legs, spins its radar and
// fires at whatever it scans.

use crate::domain::math::normal_relative_angle;
use crate::domain::{Color, NamedCondition, ProxyError, StatusSnapshot, WaitCondition, WorldEvent};
use crate::frameworks::agent_thread::AgentBlueprint;
use crate::use_cases::ControlProxy;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;
use tracing::{debug, info};

const PALETTE: [Color; 4] = [
    Color::rgb(200, 40, 40),
    Color::rgb(40, 120, 220),
    Color::rgb(40, 180, 90),
    Color::rgb(220, 180, 30),
];
const LEG: f64 = 120.0;
const FIRE_RANGE: f64 = 500.0;
const CLOSE_RANGE: f64 = 150.0;

pub fn sentry(index: usize, turns: u64) -> AgentBlueprint {
    let color = PALETTE[index % PALETTE.len()];
    let leg = if index % 2 == 0 { LEG } else { -LEG };

    AgentBlueprint {
        name: Arc::from(format!("sentry-{index}")),
        routine: Box::new(move |proxy: &mut ControlProxy| -> Result<(), ProxyError> {
            proxy.set_body_color(color)?;
            proxy.set_gun_color(color)?;
            proxy.set_radar_color(Color::rgb(255, 255, 255))?;

            while proxy.time()? < turns {
                if proxy.energy()? == 0.0 {
                    proxy.advance_turn()?;
                    continue;
                }
                proxy.set_turn_radar(TAU)?;
                proxy.move_by(leg)?;
                proxy.turn_body(FRAC_PI_2)?;
            }
            Ok(())
        }),
        on_event: Box::new(
            |event: &WorldEvent, proxy: &mut ControlProxy| -> Result<(), ProxyError> {
                match event {
                    WorldEvent::ScannedRobot {
                        name,
                        distance,
                        bearing,
                        ..
                    } => {
                        let aim = normal_relative_angle(
                            proxy.body_heading()? + bearing - proxy.gun_heading()?,
                        );
                        proxy.set_turn_gun(aim)?;
                        if *distance < FIRE_RANGE && proxy.gun_heat()? == 0.0 {
                            let power = if *distance < CLOSE_RANGE { 3.0 } else { 1.0 };
                            if let Some(p) = proxy.set_fire(power)? {
                                debug!(target_robot = %name, projectile = p.id, power, "firing");
                            }
                        }
                    }
                    WorldEvent::HitByBullet {
                        shooter, bearing, ..
                    } => {
                        debug!(%shooter, "hit by bullet");
                        proxy.set_turn_body(normal_relative_angle(bearing + FRAC_PI_2))?;
                    }
                    WorldEvent::RobotDeath { name } => info!(robot = %name, "opponent destroyed"),
                    WorldEvent::Custom { name } => debug!(condition = %name, "custom event"),
                    _ => {}
                }
                Ok(())
            },
        ),
        custom_events: vec![Box::new(NamedCondition::new(
            "low-energy",
            |s: &StatusSnapshot| s.energy > 0.0 && s.energy < 20.0,
        )) as Box<dyn WaitCondition>],
    }
}
