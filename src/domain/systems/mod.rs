pub mod motion;
pub mod projectiles;
pub mod radar;
