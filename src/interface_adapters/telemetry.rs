use crate::interface_adapters::protocol::{TelemetryMessage, TurnReportDto};
use crate::use_cases::TurnReport;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, warn};

pub async fn turn_report_serializer(
    mut report_rx: broadcast::Receiver<TurnReport>,
    latest_tx: watch::Sender<String>,
) {
    // Serialize each report once; the watch keeps only the newest.
    loop {
        match report_rx.recv().await {
            Ok(report) => {
                let time = report.time;
                let msg = TelemetryMessage::TurnReport(TurnReportDto::from(report));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, time, "failed to serialize turn report");
                        continue;
                    }
                };

                debug!(time, report = %txt, "turn report");
                let _ = latest_tx.send(txt);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "telemetry lagged; skipping to latest report");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("turn reports closed; serializer exiting");
                break;
            }
        }
    }
}
