//! Watch mode: keep the queues fresh and take desk commands from stdin.

use std::io::{self, Write};
use std::sync::Arc;

use dossier::{
    ActionRegistry, AutoConfirm, ConfirmationDialog, DeclineAll, DeskAction, DeskError,
    DossierConfig,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::build_room;
use super::output::{io_error, write_room_summary};

const COMMAND_BUFFER: usize = 16;

/// Runs the desk until stdin closes, then prints the final queue state.
///
/// Each stdin line is `action arg...`, for example `select pull 12` or
/// `mark-as-pulled A001`. Cancellations are declined unless
/// `--assume-yes` is set, because stdin is busy carrying commands.
///
/// # Errors
///
/// Returns configuration failures, stdin read failures, and
/// [`DeskError::Io`] when the summary cannot be written.
pub async fn run(config: &DossierConfig) -> Result<(), DeskError> {
    let dialog: Arc<dyn ConfirmationDialog> = if config.assume_yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(DeclineAll)
    };
    let room = build_room(config)?.with_dialog(dialog);
    let registry = ActionRegistry::new();
    let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);

    tracing::info!(
        poll_interval_secs = room.settings().poll_interval.as_secs(),
        "watching archives room queues"
    );
    let desk = tokio::spawn(dossier::desk::run(room, receiver));

    let stdin = BufReader::new(tokio::io::stdin());
    let fed = feed_commands(stdin, &registry, &sender, &mut io::stderr()).await;
    drop(sender);

    let mut room = desk.await.map_err(|error| DeskError::Io {
        message: format!("desk task failed: {error}"),
    })?;
    tracing::debug!(commands = fed?, "stdin closed");

    let report = room.refresh_all_queues().await;
    write_room_summary(&room, &report)
}

/// Parses command lines from `reader` and forwards them to the desk.
///
/// Blank lines and lines starting with `#` are ignored; malformed lines are
/// reported on `errors` and skipped. Returns the number of actions sent.
///
/// # Errors
///
/// Returns [`DeskError::Io`] when reading fails or `errors` cannot be
/// written.
pub async fn feed_commands<R, W>(
    reader: R,
    registry: &ActionRegistry,
    sender: &mpsc::Sender<DeskAction>,
    errors: &mut W,
) -> Result<usize, DeskError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut sent = 0;

    while let Some(line) = lines.next_line().await.map_err(|e| io_error(&e))? {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match registry.parse_line(trimmed) {
            Ok(action) => {
                if sender.send(action).await.is_err() {
                    tracing::warn!("desk stopped before stdin closed");
                    break;
                }
                sent += 1;
            }
            Err(error) => {
                writeln!(errors, "{error}").map_err(|e| io_error(&e))?;
            }
        }
    }

    Ok(sent)
}

#[cfg(test)]
mod tests {
    use dossier::{ActionRegistry, DeskAction, QueueKind, RequestId};
    use tokio::sync::mpsc;

    use super::feed_commands;

    #[tokio::test]
    async fn forwards_parsed_lines_and_reports_bad_ones() {
        let input = b"# morning shift\nselect pull 12\n\nshred A001\nrefresh\n".as_slice();
        let registry = ActionRegistry::new();
        let (sender, mut receiver) = mpsc::channel(8);
        let mut errors = Vec::new();

        let sent = feed_commands(input, &registry, &sender, &mut errors)
            .await
            .expect("feeding should succeed");
        drop(sender);

        assert_eq!(sent, 2);
        assert_eq!(
            receiver.recv().await,
            Some(DeskAction::Select {
                queue: QueueKind::Pull,
                request_id: RequestId::new("12"),
            })
        );
        assert_eq!(receiver.recv().await, Some(DeskAction::Refresh));
        assert_eq!(receiver.recv().await, None);
        assert_eq!(
            String::from_utf8(errors).expect("errors should be UTF-8"),
            "invalid command: unknown action `shred`\n"
        );
    }
}
