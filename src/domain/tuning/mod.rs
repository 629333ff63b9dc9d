// Gameplay constants for the reference engine, kept apart from runtime config.

pub mod projectile;
pub mod robot;
