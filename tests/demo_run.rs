use std::time::Duration;
use turn_proxy::frameworks::demo::sentry;
use turn_proxy::use_cases::{EngineSettings, GuardLimits};
use turn_proxy::{AgentExit, AgentLimits, run};

#[tokio::test(flavor = "multi_thread")]
async fn when_demo_agents_run_then_each_completes_its_turns() {
    let settings = EngineSettings {
        turn_interval: Duration::from_millis(1),
        ..Default::default()
    };
    let limits = AgentLimits {
        guard: GuardLimits::default(),
        output_max_lines: 10,
    };

    let exits = run(settings, vec![sentry(0, 40), sentry(1, 40)], limits)
        .await
        .expect("world should run");

    assert_eq!(exits.len(), 2);
    for (name, exit) in &exits {
        match exit {
            AgentExit::Completed { time, .. } => assert!(*time >= 40, "{name} stopped at {time}"),
            other => panic!("{name} did not complete: {other:?}"),
        }
    }
}
