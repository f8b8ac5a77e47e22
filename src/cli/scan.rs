//! One-shot scan submission.

use dossier::{ActionOutcome, DeskError, DossierConfig, ScanForm};

use super::build_room;

/// Marks one identifier as pulled or returned.
///
/// # Errors
///
/// Returns [`DeskError::Configuration`] when the identifier is blank, and the
/// remote failure otherwise.
pub async fn run(config: &DossierConfig, form: ScanForm) -> Result<(), DeskError> {
    let (identifier, flag) = match form {
        ScanForm::Pulled => (config.mark_pulled.as_deref(), "--mark-pulled"),
        ScanForm::Returned => (config.mark_returned.as_deref(), "--mark-returned"),
    };

    let mut room = build_room(config)?;
    room.scan_forms_mut()
        .set_input(form, identifier.unwrap_or_default());

    match room.submit_scan(form).await? {
        ActionOutcome::Completed => Ok(()),
        ActionOutcome::Skipped => Err(DeskError::Configuration {
            message: format!("{flag} needs a non-blank identifier"),
        }),
    }
}
