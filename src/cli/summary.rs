//! One-shot queue summary.

use dossier::{DeskError, DossierConfig};

use super::build_room;
use super::output::write_room_summary;

/// Loads every queue once and prints what is waiting.
///
/// # Errors
///
/// Returns configuration failures and [`DeskError::Io`] when the summary
/// cannot be written. Queue failures are reported in the summary itself.
pub async fn run(config: &DossierConfig) -> Result<(), DeskError> {
    let mut room = build_room(config)?;
    let report = room.refresh_all_queues().await;
    write_room_summary(&room, &report)
}
