use std::{env, str::FromStr, time::Duration};

// Runtime constants and env-backed settings (engine physics tuning lives in the domain).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const REPORT_BROADCAST_CAPACITY: usize = 128;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// `LOG_FORMAT=json` switches to json lines; anything else stays compact.
pub fn log_json() -> bool {
    env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}

pub fn max_set_calls() -> u32 {
    env_or("PROXY_MAX_SET_CALLS", 10_000)
}

pub fn max_get_calls() -> u32 {
    env_or("PROXY_MAX_GET_CALLS", 10_000)
}

pub fn output_max_lines() -> u32 {
    env_or("AGENT_OUTPUT_MAX_LINES", 100)
}

pub fn turn_interval() -> Duration {
    Duration::from_millis(env_or("TURN_INTERVAL_MS", 1000 / 30))
}

pub fn battlefield_width() -> f64 {
    env_or("BATTLEFIELD_WIDTH", 800.0)
}

pub fn battlefield_height() -> f64 {
    env_or("BATTLEFIELD_HEIGHT", 600.0)
}

pub fn gun_cooling_rate() -> f64 {
    env_or("GUN_COOLING_RATE", 0.1)
}

pub fn num_rounds() -> u32 {
    env_or("NUM_ROUNDS", 1)
}

// Sample run driven by the binary.
pub fn demo_turns() -> u64 {
    env_or("DEMO_TURNS", 300)
}

pub fn demo_agents() -> usize {
    env_or("DEMO_AGENTS", 2)
}
