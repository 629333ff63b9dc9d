use super::types::{EngineInput, TurnReport};
use crate::domain::math::normal_relative_angle;
use crate::domain::state::{ProjectileReport, RobotReport, SimProjectile, SimRobot};
use crate::domain::systems::{motion, projectiles, radar};
use crate::domain::tuning::projectile::ProjectileTuning;
use crate::domain::tuning::robot::RobotTuning;
use crate::domain::{ActionBuffer, BattleRules, TurnResult, WorldEvent};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

// Angle between consecutive spawn points; spreads robots without collisions.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Settings for one engine world.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub rules: Arc<BattleRules>,
    pub robot: RobotTuning,
    pub projectile: ProjectileTuning,
    /// Fixed period between resolved turns.
    pub turn_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rules: Arc::new(BattleRules::default()),
            robot: RobotTuning::default(),
            projectile: ProjectileTuning::default(),
            turn_interval: Duration::from_millis(1000 / 30),
        }
    }
}

/// Authoritative world loop.
///
/// Every tick drains pending inputs, resolves one turn for every robot that
/// handed in a buffer and only then replies to the agents blocked on that
/// turn, so a reply always reflects the buffer the agent submitted. Ticks in
/// which an agent submits nothing leave its robot where it is.
pub async fn world_task(
    mut input_rx: mpsc::Receiver<EngineInput>,
    report_tx: broadcast::Sender<TurnReport>,
    settings: EngineSettings,
    shutdown: Arc<Notify>,
) {
    let rules = Arc::clone(&settings.rules);
    let mut time: u64 = 0;
    let mut spawned: u64 = 0;
    let mut robots: Vec<SimRobot> = Vec::new();
    let mut shots: Vec<SimProjectile> = Vec::new();
    let mut event_txs: HashMap<u64, mpsc::UnboundedSender<WorldEvent>> = HashMap::new();
    let mut waiting: Vec<(u64, oneshot::Sender<TurnResult>)> = Vec::new();

    let projectile_cfg = projectiles::ProjectileConfig {
        tuning: settings.projectile,
        robot_radius: settings.robot.radius,
    };

    let mut interval = tokio::time::interval(settings.turn_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(time, "engine shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(input) = input_rx.try_recv() {
            match input {
                EngineInput::Join {
                    agent_id,
                    name,
                    events_tx,
                    reply,
                } => {
                    let (x, y) = spawn_point(spawned, &rules);
                    spawned += 1;
                    info!(agent_id, agent = %name, x, y, "robot joined");
                    let robot = SimRobot::new(
                        agent_id,
                        name,
                        x,
                        y,
                        settings.robot.start_energy,
                        settings.robot.start_gun_heat,
                    );
                    let others = robots.iter().filter(|r| r.alive).count() as u32;
                    let _ = reply.send(TurnResult {
                        commands: robot.commands.carry_over(),
                        status: robot.snapshot(time, others, &rules),
                    });
                    robots.push(robot);
                    event_txs.insert(agent_id, events_tx);
                }
                EngineInput::Turn {
                    agent_id,
                    commands,
                    reply,
                } => match robots.iter_mut().find(|r| r.id == agent_id) {
                    Some(robot) => {
                        robot.commands = commands;
                        waiting.push((agent_id, reply));
                    }
                    None => {
                        // Dropping the reply tells the agent its engine is gone.
                        warn!(agent_id, "turn from unknown robot");
                    }
                },
                EngineInput::Leave { agent_id } => {
                    info!(agent_id, "robot left");
                    robots.retain(|r| r.id != agent_id);
                    shots.retain(|p| p.owner_id != agent_id);
                    event_txs.remove(&agent_id);
                    waiting.retain(|(id, _)| *id != agent_id);
                }
            }
        }

        if robots.is_empty() {
            continue;
        }

        time += 1;
        let mut events: Vec<(u64, WorldEvent)> = Vec::new();
        let mut sweeps = Vec::new();
        // Only buffers handed in for this tick are worked off; a robot whose
        // agent is still thinking sits the turn out with its commands intact.
        let submitted: HashSet<u64> = waiting.iter().map(|(id, _)| *id).collect();

        for (idx, r) in robots.iter_mut().enumerate() {
            if !r.alive {
                // Nothing is left to work off for a destroyed robot.
                r.commands = ActionBuffer::default();
                continue;
            }
            if !submitted.contains(&r.id) {
                continue;
            }
            let scan_requested = r.commands.scan;
            let outcome = motion::tick_robot(r, &settings.robot, &rules);
            if outcome.hit_wall {
                let bearing = wall_bearing(r, &rules);
                events.push((r.id, WorldEvent::HitWall { bearing }));
            }
            if scan_requested || outcome.radar_sweep.0 != outcome.radar_sweep.1 {
                sweeps.push((idx, outcome.radar_sweep));
            }
        }

        for (idx, sweep) in sweeps {
            let scanner = &robots[idx];
            for event in radar::scan(scanner, sweep, &robots, settings.robot.radar_range) {
                events.push((scanner.id, event));
            }
        }

        events.extend(projectiles::tick_projectiles(
            &mut robots,
            &mut shots,
            &rules,
            projectile_cfg,
        ));

        // Robots driven below zero energy are destroyed.
        let mut deaths = Vec::new();
        for r in robots.iter_mut().filter(|r| r.alive && r.energy < 0.0) {
            r.alive = false;
            r.energy = 0.0;
            r.velocity = 0.0;
            r.commands = ActionBuffer::default();
            info!(agent = %r.name, time, "robot destroyed");
            deaths.push(Arc::clone(&r.name));
        }
        for name in deaths {
            for r in robots.iter().filter(|r| r.name != name) {
                events.push((
                    r.id,
                    WorldEvent::RobotDeath {
                        name: Arc::clone(&name),
                    },
                ));
            }
        }

        // Events go out before replies so agents find them at the boundary.
        for (agent_id, event) in events {
            if let Some(tx) = event_txs.get(&agent_id) {
                let _ = tx.send(event);
            }
        }

        let alive = robots.iter().filter(|r| r.alive).count() as u32;
        for (agent_id, reply) in waiting.drain(..) {
            let Some(robot) = robots.iter().find(|r| r.id == agent_id) else {
                continue;
            };
            let others = alive.saturating_sub(u32::from(robot.alive));
            let _ = reply.send(TurnResult {
                commands: robot.commands.carry_over(),
                status: robot.snapshot(time, others, &rules),
            });
        }
        for r in robots.iter_mut().filter(|r| submitted.contains(&r.id)) {
            r.commands = r.commands.carry_over();
        }

        debug!(time, robots = robots.len(), projectiles = shots.len(), "turn resolved");
        let _ = report_tx.send(TurnReport {
            time,
            robots: robots.iter().map(RobotReport::from).collect(),
            projectiles: shots.iter().map(ProjectileReport::from).collect(),
        });
    }
}

fn spawn_point(index: u64, rules: &BattleRules) -> (f64, f64) {
    let (cx, cy) = (rules.battlefield_width / 2.0, rules.battlefield_height / 2.0);
    let reach = cx.min(cy) * 2.0 / 3.0;
    let angle = index as f64 * GOLDEN_ANGLE;
    (cx + angle.sin() * reach, cy + angle.cos() * reach)
}

// Bearing from the robot's body to the nearest wall.
fn wall_bearing(r: &SimRobot, rules: &BattleRules) -> f64 {
    use std::f64::consts::{FRAC_PI_2, PI};

    // (distance to wall, absolute heading facing it)
    let walls = [
        (rules.battlefield_height - r.y, 0.0),
        (rules.battlefield_width - r.x, FRAC_PI_2),
        (r.y, PI),
        (r.x, -FRAC_PI_2),
    ];
    let heading = walls
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map_or(0.0, |(_, heading)| heading);
    normal_relative_angle(heading - r.body_heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_settings() -> EngineSettings {
        EngineSettings {
            turn_interval: Duration::from_millis(1),
            ..Default::default()
        }
    }

    async fn join(
        input_tx: &mpsc::Sender<EngineInput>,
        agent_id: u64,
        name: &str,
    ) -> (TurnResult, mpsc::UnboundedReceiver<WorldEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (reply, reply_rx) = oneshot::channel();
        input_tx
            .send(EngineInput::Join {
                agent_id,
                name: Arc::from(name),
                events_tx,
                reply,
            })
            .await
            .expect("engine should accept joins");
        (reply_rx.await.expect("join reply"), events_rx)
    }

    async fn turn(
        input_tx: &mpsc::Sender<EngineInput>,
        agent_id: u64,
        commands: ActionBuffer,
    ) -> TurnResult {
        let (reply, reply_rx) = oneshot::channel();
        input_tx
            .send(EngineInput::Turn {
                agent_id,
                commands,
                reply,
            })
            .await
            .expect("engine should accept turns");
        reply_rx.await.expect("turn reply")
    }

    #[tokio::test]
    async fn when_robot_submits_a_move_then_reply_reflects_that_turn() {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (report_tx, _report_rx) = broadcast::channel(16);
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(world_task(
            input_rx,
            report_tx,
            fast_settings(),
            Arc::clone(&shutdown),
        ));

        let (first, _events) = join(&input_tx, 1, "alpha").await;
        let result = turn(
            &input_tx,
            1,
            ActionBuffer {
                distance_remaining: -20.0,
                moved: true,
                ..Default::default()
            },
        )
        .await;

        assert_eq!(result.commands.distance_remaining, -12.0);
        assert!((result.status.y - (first.status.y - 8.0)).abs() < 1e-9);
        assert!(result.status.time > first.status.time);

        shutdown.notify_one();
        task.await.expect("world task should stop");
    }

    #[tokio::test]
    async fn when_agent_is_slow_between_turns_then_robot_moves_one_step_per_submission() {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (report_tx, _report_rx) = broadcast::channel(16);
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(world_task(
            input_rx,
            report_tx,
            fast_settings(),
            Arc::clone(&shutdown),
        ));

        let (first, _events) = join(&input_tx, 1, "alpha").await;
        let after_one = turn(
            &input_tx,
            1,
            ActionBuffer {
                distance_remaining: -100.0,
                moved: true,
                ..Default::default()
            },
        )
        .await;

        // Several world ticks pass without a submission.
        tokio::time::sleep(Duration::from_millis(15)).await;
        let after_two = turn(&input_tx, 1, after_one.commands.clone()).await;

        assert_eq!(after_one.commands.distance_remaining, -92.0);
        assert!((after_one.status.y - (first.status.y - 8.0)).abs() < 1e-9);
        assert_eq!(after_two.commands.distance_remaining, -84.0);
        assert!((after_two.status.y - (first.status.y - 16.0)).abs() < 1e-9);

        shutdown.notify_one();
        task.await.expect("world task should stop");
    }

    #[tokio::test]
    async fn when_second_robot_joins_then_others_counts_it() {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (report_tx, _report_rx) = broadcast::channel(16);
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(world_task(
            input_rx,
            report_tx,
            fast_settings(),
            Arc::clone(&shutdown),
        ));

        let (_first, _events_a) = join(&input_tx, 1, "alpha").await;
        let (second, _events_b) = join(&input_tx, 2, "beta").await;
        let result = turn(&input_tx, 1, ActionBuffer::default()).await;

        assert_eq!(second.status.others, 1);
        assert_eq!(result.status.others, 1);

        shutdown.notify_one();
        task.await.expect("world task should stop");
    }

    #[test]
    fn when_spawning_then_points_stay_inside_the_field() {
        let rules = BattleRules::default();
        for index in 0..32 {
            let (x, y) = spawn_point(index, &rules);
            assert!(x > 18.0 && x < rules.battlefield_width - 18.0);
            assert!(y > 18.0 && y < rules.battlefield_height - 18.0);
        }
    }
}
