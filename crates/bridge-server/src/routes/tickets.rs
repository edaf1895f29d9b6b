use axum::extract::State;
use axum::Json;
use bridge_core::BatchOutcome;

use crate::error::AppError;
use crate::state::AppState;

/// GET|POST /process-tickets — run one reconciliation pass over the sheet.
///
/// Both methods behave identically; GET serves pollers and POST serves
/// webhooks.
pub async fn process_tickets(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let reconciler = app.reconciler()?;
    let outcome = reconciler.process_batch().await?;

    if let BatchOutcome::Processed(report) = &outcome {
        tracing::info!(
            pass_id = %report.pass_id,
            rows_scanned = report.rows_scanned,
            issues_filed = report.filed.len(),
            "tickets processed"
        );
    }

    Ok(Json(serde_json::json!({ "result": outcome.message() })))
}
