use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::math::{normal_absolute_angle, step_toward_zero};
use crate::domain::{
    ActionBuffer, AgentPeer, BattleRules, EngineError, OutputChannel, StatusSnapshot,
    ThreadToken, TurnEngine, TurnResult,
};
use crate::use_cases::call_guard::GuardLimits;
use crate::use_cases::proxy::ControlProxy;

pub(crate) type Submitted = Arc<Mutex<Vec<ActionBuffer>>>;

pub(crate) fn status_at(x: f64, y: f64) -> StatusSnapshot {
    let mut status = StatusSnapshot::spawn(x, y, 100.0, Arc::new(BattleRules::default()));
    status.gun_heat = 0.0;
    status
}

// Engine that resolves turns instantly, optionally capping movement and
// rotation per turn, and records every buffer it consumed.
pub(crate) struct ScriptedEngine {
    status: StatusSnapshot,
    submitted: Submitted,
    max_step: f64,
    max_turn: f64,
    disconnected: bool,
}

impl ScriptedEngine {
    pub(crate) fn new(status: StatusSnapshot) -> Self {
        Self {
            status,
            submitted: Arc::new(Mutex::new(Vec::new())),
            max_step: f64::INFINITY,
            max_turn: f64::INFINITY,
            disconnected: false,
        }
    }

    pub(crate) fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    pub(crate) fn with_max_turn(mut self, max_turn: f64) -> Self {
        self.max_turn = max_turn;
        self
    }

    pub(crate) fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    pub(crate) fn submitted(&self) -> Submitted {
        Arc::clone(&self.submitted)
    }
}

impl TurnEngine for ScriptedEngine {
    fn submit_and_advance(&mut self, commands: ActionBuffer) -> Result<TurnResult, EngineError> {
        if self.disconnected {
            return Err(EngineError::Disconnected);
        }
        self.submitted
            .lock()
            .expect("submitted mutex poisoned")
            .push(commands.clone());

        let mut next = commands.carry_over();
        let s = &mut self.status;
        for (heading, remaining) in [
            (&mut s.body_heading, &mut next.body_turn_remaining),
            (&mut s.gun_heading, &mut next.gun_turn_remaining),
            (&mut s.radar_heading, &mut next.radar_turn_remaining),
        ] {
            let turn = step_toward_zero(*remaining, self.max_turn);
            *heading = normal_absolute_angle(*heading + turn);
            *remaining -= turn;
        }

        let step = step_toward_zero(next.distance_remaining, self.max_step);
        s.x += s.body_heading.sin() * step;
        s.y += s.body_heading.cos() * step;
        s.velocity = step;
        next.distance_remaining -= step;

        if !commands.projectiles.is_empty() {
            s.gun_heat = 1.2;
        } else {
            s.gun_heat = (s.gun_heat - s.rules.gun_cooling_rate).max(0.0);
        }
        s.time += 1;

        Ok(TurnResult {
            commands: next,
            status: s.clone(),
        })
    }
}

pub(crate) struct TestPeer {
    pub(crate) name: Arc<str>,
    pub(crate) owner: Option<ThreadToken>,
    pub(crate) testing: AtomicBool,
}

impl TestPeer {
    pub(crate) fn bound_here(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: Arc::from(name),
            owner: Some(ThreadToken::current()),
            testing: AtomicBool::new(false),
        })
    }
}

impl AgentPeer for TestPeer {
    fn name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    fn owner_thread(&self) -> Option<ThreadToken> {
        self.owner
    }

    fn is_testing_condition(&self) -> bool {
        self.testing.load(Ordering::SeqCst)
    }
}

// Output channel that keeps every line and counts resets.
#[derive(Default)]
pub(crate) struct RecordingOutput {
    pub(crate) lines: Mutex<Vec<String>>,
    pub(crate) resets: AtomicU32,
    // Shared journal so tests can check ordering against event dispatch.
    pub(crate) journal: Option<Arc<Mutex<Vec<&'static str>>>>,
}

impl RecordingOutput {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines mutex poisoned").clone()
    }
}

impl OutputChannel for RecordingOutput {
    fn println(&self, line: &str) {
        self.lines
            .lock()
            .expect("lines mutex poisoned")
            .push(line.to_string());
    }

    fn reset_counter(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.lock().expect("journal mutex poisoned").push("reset");
        }
    }
}

pub(crate) fn proxy_with(
    engine: ScriptedEngine,
    status: StatusSnapshot,
    limits: GuardLimits,
) -> (ControlProxy, Arc<RecordingOutput>) {
    let output = Arc::new(RecordingOutput::default());
    let proxy = proxy_with_output(engine, status, limits, Arc::clone(&output));
    (proxy, output)
}

pub(crate) fn proxy_with_output(
    engine: ScriptedEngine,
    status: StatusSnapshot,
    limits: GuardLimits,
    output: Arc<RecordingOutput>,
) -> ControlProxy {
    ControlProxy::new(
        Box::new(engine),
        TestPeer::bound_here("alpha"),
        output,
        limits,
        TurnResult {
            commands: ActionBuffer::default(),
            status,
        },
    )
}
