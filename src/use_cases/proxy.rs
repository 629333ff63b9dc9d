// The agent-facing control facade and its turn handoff.

use crate::domain::{
    ActionBuffer, AgentPeer, CallKind, Color, IgnoreReason, IntentOutcome, OutputChannel,
    Projectile, ProxyError, RenderTarget, StatusSnapshot, ThreadToken, TurnEngine, TurnResult,
    WaitCondition,
};
use crate::use_cases::call_guard::{CallGuard, GuardLimits, GuardTrip};
use std::cell::Cell;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Drains queued world events at a turn boundary.
///
/// Handlers get the proxy back, so they can query status and record intents
/// for the next turn.
pub trait EventDispatcher: Send {
    fn process_events(&mut self, proxy: &mut ControlProxy) -> Result<(), ProxyError>;
}

/// Everything an agent's control thread may do to the world goes through here.
///
/// Intent setters write into the pending [`ActionBuffer`]; queries read the
/// last [`StatusSnapshot`]. [`ControlProxy::advance_turn`] is the only call
/// that blocks: it moves the buffer into the engine and adopts the result.
pub struct ControlProxy {
    name: Arc<str>,
    engine: Box<dyn TurnEngine>,
    peer: Arc<dyn AgentPeer>,
    output: Arc<dyn OutputChannel>,
    dispatcher: Option<Box<dyn EventDispatcher>>,
    guard: CallGuard,
    // Set on the first guard trip; the agent stays disabled afterwards.
    disabled: Cell<Option<GuardTrip>>,
    status: StatusSnapshot,
    commands: ActionBuffer,
    wait_condition: Option<Box<dyn WaitCondition>>,
    projectile_seq: u64,
}

impl ControlProxy {
    pub fn new(
        engine: Box<dyn TurnEngine>,
        peer: Arc<dyn AgentPeer>,
        output: Arc<dyn OutputChannel>,
        limits: GuardLimits,
        initial: TurnResult,
    ) -> Self {
        Self {
            name: peer.name(),
            engine,
            peer,
            output,
            dispatcher: None,
            guard: CallGuard::new(limits),
            disabled: Cell::new(None),
            status: initial.status,
            commands: initial.commands,
            wait_condition: None,
            projectile_seq: 0,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Box<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn initialize(&mut self) {
        self.guard.reset();
        debug!(agent = %self.name, "control proxy initialized");
    }

    pub fn cleanup(&mut self) {
        if let Some(condition) = self.wait_condition.take() {
            debug!(agent = %self.name, condition = condition.name(), "wait condition discarded");
        }
    }

    // -----------
    // blocking actions
    // -----------

    /// Hands the pending buffer to the engine and blocks until the turn is resolved.
    pub fn advance_turn(&mut self) -> Result<(), ProxyError> {
        self.ensure_control_context()?;

        self.guard.reset();

        // A satisfied wait condition is spent and makes the agent scan again.
        let satisfied = self
            .wait_condition
            .as_ref()
            .is_some_and(|c| c.test(&self.status));
        if satisfied {
            if let Some(condition) = self.wait_condition.take() {
                trace!(agent = %self.name, condition = condition.name(), "wait condition satisfied");
            }
            self.commands.scan = true;
        }

        let commands = std::mem::take(&mut self.commands);
        let TurnResult { commands, status } =
            self.engine.submit_and_advance(commands).inspect_err(|e| {
                error!(agent = %self.name, error = %e, "turn handoff failed");
            })?;
        self.commands = commands;
        self.status = status;
        trace!(agent = %self.name, time = self.status.time, "turn advanced");

        self.notify_turn_boundary()
    }

    pub fn move_by(&mut self, distance: f64) -> Result<(), ProxyError> {
        self.ensure_control_context()?;
        self.set_move(distance)?;
        loop {
            self.advance_turn()?;
            if self.distance_remaining()? == 0.0 {
                return Ok(());
            }
        }
    }

    pub fn turn_body(&mut self, radians: f64) -> Result<(), ProxyError> {
        self.ensure_control_context()?;
        self.set_turn_body(radians)?;
        loop {
            self.advance_turn()?;
            if self.body_turn_remaining()? == 0.0 {
                return Ok(());
            }
        }
    }

    pub fn turn_gun(&mut self, radians: f64) -> Result<(), ProxyError> {
        self.ensure_control_context()?;
        self.set_turn_gun(radians)?;
        loop {
            self.advance_turn()?;
            if self.gun_turn_remaining()? == 0.0 {
                return Ok(());
            }
        }
    }

    pub fn turn_radar(&mut self, radians: f64) -> Result<(), ProxyError> {
        self.ensure_control_context()?;
        self.set_turn_radar(radians)?;
        loop {
            self.advance_turn()?;
            if self.radar_turn_remaining()? == 0.0 {
                return Ok(());
            }
        }
    }

    /// Records a fire intent and advances one turn. `None` when the gun
    /// could not fire.
    pub fn fire(&mut self, power: f64) -> Result<Option<Projectile>, ProxyError> {
        self.ensure_control_context()?;
        let projectile = self.set_fire(power)?;
        self.advance_turn()?;
        Ok(projectile)
    }

    pub fn scan(&mut self) -> Result<(), ProxyError> {
        self.ensure_control_context()?;
        self.set_scan()?;
        self.advance_turn()
    }

    /// Advances turns until `condition` holds.
    pub fn wait_for<C>(&mut self, condition: C) -> Result<(), ProxyError>
    where
        C: WaitCondition + 'static,
    {
        self.ensure_control_context()?;
        self.wait_condition = Some(Box::new(condition));
        let result = self.wait_loop();
        self.wait_condition = None;
        result
    }

    fn wait_loop(&mut self) -> Result<(), ProxyError> {
        loop {
            self.advance_turn()?;
            match &self.wait_condition {
                // Spent by the turn advance.
                None => return Ok(()),
                Some(c) if c.test(&self.status) => return Ok(()),
                Some(_) => {}
            }
        }
    }

    // -----------
    // asynchronous intents
    // -----------

    pub fn set_move(&mut self, distance: f64) -> Result<IntentOutcome, ProxyError> {
        self.set_call()?;
        if distance.is_nan() {
            self.reject_nan("move");
            return Ok(IntentOutcome::Ignored(IgnoreReason::InvalidNumber));
        }
        if self.energy()? == 0.0 {
            return Ok(IntentOutcome::Ignored(IgnoreReason::NoEnergy));
        }
        self.commands.distance_remaining = distance;
        self.commands.moved = true;
        Ok(IntentOutcome::Recorded)
    }

    pub fn set_turn_body(&mut self, radians: f64) -> Result<IntentOutcome, ProxyError> {
        self.set_call()?;
        if radians.is_nan() {
            self.reject_nan("turn_body");
            return Ok(IntentOutcome::Ignored(IgnoreReason::InvalidNumber));
        }
        if self.status.energy > 0.0 {
            self.commands.body_turn_remaining = radians;
            return Ok(IntentOutcome::Recorded);
        }
        Ok(IntentOutcome::Ignored(IgnoreReason::NoEnergy))
    }

    pub fn set_turn_gun(&mut self, radians: f64) -> Result<IntentOutcome, ProxyError> {
        self.set_call()?;
        if radians.is_nan() {
            self.reject_nan("turn_gun");
            return Ok(IntentOutcome::Ignored(IgnoreReason::InvalidNumber));
        }
        self.commands.gun_turn_remaining = radians;
        Ok(IntentOutcome::Recorded)
    }

    pub fn set_turn_radar(&mut self, radians: f64) -> Result<IntentOutcome, ProxyError> {
        self.set_call()?;
        if radians.is_nan() {
            self.reject_nan("turn_radar");
            return Ok(IntentOutcome::Ignored(IgnoreReason::InvalidNumber));
        }
        self.commands.radar_turn_remaining = radians;
        Ok(IntentOutcome::Recorded)
    }

    /// Queues a projectile aimed along the current gun heading.
    pub fn set_fire(&mut self, power: f64) -> Result<Option<Projectile>, ProxyError> {
        self.set_call()?;
        if power.is_nan() {
            self.reject_nan("fire");
            return Ok(None);
        }
        if self.status.gun_heat > 0.0 || self.status.energy == 0.0 {
            return Ok(None);
        }

        self.projectile_seq += 1;
        let projectile = Projectile {
            id: self.projectile_seq,
            heading: self.status.gun_heading,
            x: self.status.x,
            y: self.status.y,
            power,
            owner: Arc::clone(&self.name),
        };
        self.commands.projectiles.push(projectile.clone());
        Ok(Some(projectile))
    }

    pub fn set_scan(&mut self) -> Result<(), ProxyError> {
        self.set_call()?;
        self.commands.scan = true;
        Ok(())
    }

    /// Installs a condition consulted at the start of every turn advance.
    /// Replaces any condition already installed.
    pub fn set_wait_condition(&mut self, condition: Box<dyn WaitCondition>) -> Result<(), ProxyError> {
        self.set_call()?;
        self.wait_condition = Some(condition);
        Ok(())
    }

    // -----------
    // fast setters
    // -----------

    pub fn set_body_color(&mut self, color: Color) -> Result<(), ProxyError> {
        self.set_call()?;
        self.commands.colors.body = Some(color);
        Ok(())
    }

    pub fn set_gun_color(&mut self, color: Color) -> Result<(), ProxyError> {
        self.set_call()?;
        self.commands.colors.gun = Some(color);
        Ok(())
    }

    pub fn set_radar_color(&mut self, color: Color) -> Result<(), ProxyError> {
        self.set_call()?;
        self.commands.colors.radar = Some(color);
        Ok(())
    }

    pub fn set_bullet_color(&mut self, color: Color) -> Result<(), ProxyError> {
        self.set_call()?;
        self.commands.colors.bullet = Some(color);
        Ok(())
    }

    pub fn set_scan_color(&mut self, color: Color) -> Result<(), ProxyError> {
        self.set_call()?;
        self.commands.colors.scan = Some(color);
        Ok(())
    }

    // -----------
    // queries
    // -----------

    pub fn name(&self) -> Result<Arc<str>, ProxyError> {
        self.get_call()?;
        Ok(Arc::clone(&self.name))
    }

    pub fn status(&self) -> Result<StatusSnapshot, ProxyError> {
        self.get_call()?;
        Ok(self.status.clone())
    }

    pub fn x(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.x)
    }

    pub fn y(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.y)
    }

    pub fn body_heading(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.body_heading)
    }

    pub fn gun_heading(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.gun_heading)
    }

    pub fn radar_heading(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.radar_heading)
    }

    pub fn velocity(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.velocity)
    }

    pub fn energy(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.energy)
    }

    pub fn gun_heat(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.gun_heat)
    }

    pub fn time(&self) -> Result<u64, ProxyError> {
        self.get_call()?;
        Ok(self.status.time)
    }

    pub fn round_num(&self) -> Result<u32, ProxyError> {
        self.get_call()?;
        Ok(self.status.round_num)
    }

    pub fn others(&self) -> Result<u32, ProxyError> {
        self.get_call()?;
        Ok(self.status.others)
    }

    pub fn num_rounds(&self) -> Result<u32, ProxyError> {
        self.get_call()?;
        Ok(self.status.rules.num_rounds)
    }

    pub fn battlefield_width(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.rules.battlefield_width)
    }

    pub fn battlefield_height(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.rules.battlefield_height)
    }

    pub fn gun_cooling_rate(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.status.rules.gun_cooling_rate)
    }

    pub fn distance_remaining(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.commands.distance_remaining)
    }

    pub fn body_turn_remaining(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.commands.body_turn_remaining)
    }

    pub fn gun_turn_remaining(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.commands.gun_turn_remaining)
    }

    pub fn radar_turn_remaining(&self) -> Result<f64, ProxyError> {
        self.get_call()?;
        Ok(self.commands.radar_turn_remaining)
    }

    /// Drawing surface provided by the runtime, passed through as is.
    pub fn graphics(&self) -> Result<Option<RenderTarget>, ProxyError> {
        self.get_call()?;
        Ok(self.peer.render_target())
    }

    // -----------
    // internals
    // -----------

    // Uncounted read for runtime collaborators testing conditions at a boundary.
    pub(crate) fn current_status(&self) -> &StatusSnapshot {
        &self.status
    }

    fn ensure_control_context(&self) -> Result<(), ProxyError> {
        self.ensure_enabled()?;
        if self.peer.owner_thread() != Some(ThreadToken::current()) {
            warn!(agent = %self.name, "turn requested from a foreign thread");
            return Err(ProxyError::WrongThreadAccess);
        }
        if self.peer.is_testing_condition() {
            warn!(agent = %self.name, "turn requested inside a condition test");
            return Err(ProxyError::IllegalDuringConditionTest);
        }
        Ok(())
    }

    fn notify_turn_boundary(&mut self) -> Result<(), ProxyError> {
        // Reset before dispatch, otherwise output from event handlers is
        // charged to the turn that just ended.
        self.output.reset_counter();

        // Taken out while running so a nested turn advance from a handler
        // does not dispatch recursively.
        let Some(mut dispatcher) = self.dispatcher.take() else {
            return Ok(());
        };
        let result = dispatcher.process_events(self);
        self.dispatcher = Some(dispatcher);
        result
    }

    fn ensure_enabled(&self) -> Result<(), ProxyError> {
        match self.disabled.get() {
            Some(trip) => Err(ProxyError::GuardExceeded {
                kind: trip.kind,
                calls: trip.calls,
            }),
            None => Ok(()),
        }
    }

    fn set_call(&self) -> Result<(), ProxyError> {
        self.ensure_enabled()?;
        self.guard
            .record(CallKind::Set)
            .map(drop)
            .map_err(|trip| self.guard_tripped(trip))
    }

    fn get_call(&self) -> Result<(), ProxyError> {
        self.ensure_enabled()?;
        self.guard
            .record(CallKind::Get)
            .map(drop)
            .map_err(|trip| self.guard_tripped(trip))
    }

    fn guard_tripped(&self, trip: GuardTrip) -> ProxyError {
        self.disabled.set(Some(trip));
        self.output.println(&format!(
            "SYSTEM: You have made {} calls to {} methods without advancing a turn",
            trip.calls, trip.kind
        ));
        warn!(agent = %self.name, kind = %trip.kind, calls = trip.calls, "call guard tripped; disabling agent");
        ProxyError::GuardExceeded {
            kind: trip.kind,
            calls: trip.calls,
        }
    }

    fn reject_nan(&self, call: &str) {
        self.output
            .println(&format!("SYSTEM: You cannot call {call}(NaN)"));
        warn!(agent = %self.name, call, "NaN argument ignored");
    }
}
