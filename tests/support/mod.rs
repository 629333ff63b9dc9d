// Boots the reference engine on its own runtime thread so tests can drive
// proxies from plain blocking threads, the way control threads do.
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread::JoinHandle,
    time::Duration,
};

use tokio::sync::{Notify, broadcast, mpsc};
use turn_proxy::ControlProxy;
use turn_proxy::interface_adapters::{AgentContext, EngineHandle, Joined, TracingOutput};
use turn_proxy::use_cases::{EngineInput, EngineSettings, GuardLimits, world_task};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub struct TestWorld {
    input_tx: mpsc::Sender<EngineInput>,
    shutdown: Arc<Notify>,
    thread: Option<JoinHandle<()>>,
}

impl TestWorld {
    pub fn start() -> Self {
        let (input_tx, input_rx) = mpsc::channel(64);
        let shutdown = Arc::new(Notify::new());
        let engine_shutdown = Arc::clone(&shutdown);
        let settings = EngineSettings {
            turn_interval: Duration::from_millis(1),
            ..Default::default()
        };

        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .expect("test runtime");
            runtime.block_on(async move {
                let (report_tx, _report_rx) = broadcast::channel(16);
                world_task(input_rx, report_tx, settings, engine_shutdown).await;
            });
        });

        Self {
            input_tx,
            shutdown,
            thread: Some(thread),
        }
    }

    /// Joins a robot and binds its proxy to the calling thread.
    pub fn connect(&self, name: &str) -> ControlProxy {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let context = Arc::new(AgentContext::new(name));
        context.bind_current_thread();

        let Joined {
            engine, initial, ..
        } = EngineHandle::join(self.input_tx.clone(), id, Arc::from(name))
            .expect("engine should accept the robot");
        let output = Arc::new(TracingOutput::new(Arc::from(name), 100));

        ControlProxy::new(
            Box::new(engine),
            context,
            output,
            GuardLimits::default(),
            initial,
        )
    }
}

impl Drop for TestWorld {
    fn drop(&mut self) {
        self.shutdown.notify_one();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
