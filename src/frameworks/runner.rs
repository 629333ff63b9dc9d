// Framework bootstrap: engine task, telemetry and agent control threads.

use crate::domain::BattleRules;
use crate::frameworks::agent_thread::{AgentBlueprint, AgentExit, AgentLimits, spawn_agent};
use crate::frameworks::{config, demo};
use crate::interface_adapters::telemetry::turn_report_serializer;
use crate::use_cases::{EngineInput, EngineSettings, GuardLimits, TurnReport, world_task};

use std::{io::Result, sync::Arc};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

// Loads `.env`, installs the subscriber and routes panics through tracing.
// Control threads are named after their agent, so the thread name is logged.
fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true);
    if config::log_json() {
        fmt.json().with_current_span(true).init();
    } else {
        fmt.compact().init();
    }

    std::panic::set_hook(Box::new(|info| {
        let thread = std::thread::current();
        let backtrace = std::backtrace::Backtrace::capture();
        error!(
            thread = thread.name().unwrap_or("unnamed"),
            %info,
            ?backtrace,
            "thread panicked"
        );
    }));
}

/// Runs one world until every agent's control thread has ended.
pub async fn run(
    settings: EngineSettings,
    agents: Vec<AgentBlueprint>,
    limits: AgentLimits,
) -> Result<Vec<(Arc<str>, AgentExit)>> {
    let (input_tx, input_rx) = mpsc::channel::<EngineInput>(config::INPUT_CHANNEL_CAPACITY);
    let (report_tx, report_rx) =
        broadcast::channel::<TurnReport>(config::REPORT_BROADCAST_CAPACITY);
    let (latest_tx, latest_rx) = watch::channel(String::new());
    let shutdown = Arc::new(Notify::new());

    let engine = tokio::spawn(world_task(
        input_rx,
        report_tx,
        settings,
        Arc::clone(&shutdown),
    ));
    tokio::spawn(turn_report_serializer(report_rx, latest_tx));

    let mut threads = Vec::with_capacity(agents.len());
    for blueprint in agents {
        let name = Arc::clone(&blueprint.name);
        let handle = spawn_agent(input_tx.clone(), blueprint, limits).inspect_err(|e| {
            error!(agent = %name, error = %e, "failed to spawn control thread");
        })?;
        threads.push((name, handle));
    }
    // Agents hold the remaining senders.
    drop(input_tx);

    let mut exits = Vec::with_capacity(threads.len());
    for (name, handle) in threads {
        let exit = tokio::task::spawn_blocking(move || handle.join())
            .await
            .map_err(std::io::Error::other)?
            .unwrap_or(AgentExit::Panicked);
        match &exit {
            AgentExit::Completed { time, .. } => info!(agent = %name, time, "agent completed"),
            AgentExit::Disabled(e) => warn!(agent = %name, error = %e, "agent disabled"),
            AgentExit::Panicked => error!(agent = %name, "agent panicked"),
        }
        exits.push((name, exit));
    }

    shutdown.notify_one();
    if let Err(e) = engine.await {
        error!(error = %e, "engine task failed");
    }
    let final_report = latest_rx.borrow().clone();
    debug!(%final_report, "world stopped");

    Ok(exits)
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = EngineSettings {
        rules: Arc::new(BattleRules {
            battlefield_width: config::battlefield_width(),
            battlefield_height: config::battlefield_height(),
            gun_cooling_rate: config::gun_cooling_rate(),
            num_rounds: config::num_rounds(),
        }),
        turn_interval: config::turn_interval(),
        ..Default::default()
    };
    let limits = AgentLimits {
        guard: GuardLimits {
            max_set_calls: config::max_set_calls(),
            max_get_calls: config::max_get_calls(),
        },
        output_max_lines: config::output_max_lines(),
    };
    let turns = config::demo_turns();
    let agents = (0..config::demo_agents())
        .map(|index| demo::sentry(index, turns))
        .collect();

    info!(
        turn_interval_ms = settings.turn_interval.as_millis() as u64,
        turns, "starting demo world"
    );
    let exits = run(settings, agents, limits).await?;
    let completed = exits
        .iter()
        .filter(|(_, exit)| matches!(exit, AgentExit::Completed { .. }))
        .count();
    info!(completed, total = exits.len(), "demo finished");
    Ok(())
}
