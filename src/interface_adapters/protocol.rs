// Telemetry DTOs and conversions for per-turn engine reports.

use crate::domain::state::{ProjectileReport, RobotReport};
use crate::use_cases::TurnReport;
use serde::Serialize;

/// Messages emitted by the telemetry serializer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum TelemetryMessage {
    // Snapshot of the battlefield after a resolved turn.
    TurnReport(TurnReportDto),
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnReportDto {
    pub time: u64,
    pub robots: Vec<RobotStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
}

impl From<TurnReport> for TurnReportDto {
    fn from(report: TurnReport) -> Self {
        Self {
            time: report.time,
            robots: report.robots.iter().map(RobotStateDto::from).collect(),
            projectiles: report
                .projectiles
                .iter()
                .map(ProjectileStateDto::from)
                .collect(),
        }
    }
}

/// Flattened robot state.
#[derive(Debug, Clone, Serialize)]
pub struct RobotStateDto {
    pub id: u64,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub energy: f64,
}

impl From<&RobotReport> for RobotStateDto {
    fn from(robot: &RobotReport) -> Self {
        Self {
            id: robot.id,
            name: robot.name.to_string(),
            x: robot.x,
            y: robot.y,
            heading: robot.heading,
            energy: robot.energy,
        }
    }
}

/// Flattened projectile state.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectileStateDto {
    pub id: u64,
    pub owner_id: u64,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl From<&ProjectileReport> for ProjectileStateDto {
    fn from(projectile: &ProjectileReport) -> Self {
        Self {
            id: projectile.id,
            owner_id: projectile.owner_id,
            x: projectile.x,
            y: projectile.y,
            heading: projectile.heading,
        }
    }
}
