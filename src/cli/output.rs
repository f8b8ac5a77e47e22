//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use dossier::{ArchivesRoom, DeskError, QueueKind, RecordRequest, RefreshReport};

/// Writes a summary of every queue to stdout.
///
/// # Errors
///
/// Returns [`DeskError::Io`] when stdout cannot be written.
pub fn write_room_summary(room: &ArchivesRoom, report: &RefreshReport) -> Result<(), DeskError> {
    let mut stdout = io::stdout().lock();
    write_room_summary_to(&mut stdout, room, report)
}

/// Writes a summary of every queue to the given writer.
///
/// Queues that could not be refreshed are flagged so stale counts are not
/// mistaken for current ones.
///
/// # Errors
///
/// Returns [`DeskError::Io`] when the writer fails.
pub fn write_room_summary_to<W: Write>(
    writer: &mut W,
    room: &ArchivesRoom,
    report: &RefreshReport,
) -> Result<(), DeskError> {
    for kind in QueueKind::ALL {
        let queue = room.queue(kind);
        let stale = if report.failed.contains(&kind.label()) {
            " (refresh failed)"
        } else {
            ""
        };
        writeln!(
            writer,
            "{}: {} request(s){stale}",
            heading(kind),
            queue.visible_records().count()
        )
        .map_err(|e| io_error(&e))?;

        for record in queue.records_by_time_requested() {
            writeln!(writer, "  {}", record_line(record)).map_err(|e| io_error(&e))?;
        }
    }

    let merges = room.merge_queue();
    let stale = if report.failed.contains(&"merge") {
        " (refresh failed)"
    } else {
        ""
    };
    writeln!(writer, "Merge requests: {}{stale}", merges.len()).map_err(|e| io_error(&e))?;
    for merge in merges.requests() {
        writeln!(
            writer,
            "  #{} {} ({}) <- {} ({}) since {}",
            merge.merge_request_id,
            merge.preferred_name,
            merge.preferred_identifier,
            merge.not_preferred_name,
            merge.not_preferred_identifier,
            merge.date_created
        )
        .map_err(|e| io_error(&e))?;
    }

    Ok(())
}

const fn heading(kind: QueueKind) -> &'static str {
    match kind {
        QueueKind::Pull => "Records to pull",
        QueueKind::Create => "Records to create",
        QueueKind::AssignedPull => "Assigned pulls",
        QueueKind::AssignedCreate => "Assigned creates",
    }
}

fn record_line(record: &RecordRequest) -> String {
    let dossier = if record.dossier_number.is_empty() {
        "(no dossier)"
    } else {
        record.dossier_number.as_str()
    };
    let mut line = format!(
        "#{} {} {dossier} -> {} at {}",
        record.request_id, record.patient_name, record.send_to_location, record.time_requested
    );
    if let (Some(location), Some(date)) = (&record.location_last_sent, &record.date_last_sent) {
        line.push_str(&format!(" (last sent to {location} on {date})"));
    }
    line
}

/// Converts an I/O error into [`DeskError::Io`].
pub fn io_error(error: &io::Error) -> DeskError {
    DeskError::Io {
        message: error.to_string(),
    }
}
