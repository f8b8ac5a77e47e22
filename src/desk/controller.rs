//! Action identifiers, batch controls, and action dispatch.
//!
//! Every user gesture the archives room understands has a stable action
//! name. [`ActionRegistry`] binds those names to [`DeskAction`] builders
//! once, and [`ArchivesRoom::dispatch`] routes each action to its handler.

use std::collections::HashMap;

use super::ArchivesRoom;
use super::scan::ScanForm;
use crate::archives::endpoint::{AssignmentKind, QueueKind};
use crate::archives::error::DeskError;
use crate::archives::models::{MergeRequestId, RequestId};

/// Something the clerk asked the desk to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskAction {
    /// Submit an identifier through the "mark as pulled" scan form.
    MarkAsPulled {
        /// Raw identifier as typed or scanned.
        identifier: String,
    },
    /// Submit an identifier through the "mark as returned" scan form.
    MarkAsReturned {
        /// Raw identifier as typed or scanned.
        identifier: String,
    },
    /// Assign the selected requests of an open queue.
    Assign(AssignmentKind),
    /// Confirm a physical merge of two paper records.
    ConfirmMerge(MergeRequestId),
    /// Cancel one request, behind a confirmation dialog.
    CancelRequest {
        /// Queue showing the request.
        queue: QueueKind,
        /// Request to cancel.
        request_id: RequestId,
    },
    /// Print the form label of an assigned pull request.
    PrintLabel(RequestId),
    /// Print the label set of an assigned create request.
    PrintLabelSet(RequestId),
    /// Toggle a row's selection.
    Select {
        /// Queue showing the row.
        queue: QueueKind,
        /// Row to toggle.
        request_id: RequestId,
    },
    /// Pointer entered a row.
    Hover {
        /// Queue showing the row.
        queue: QueueKind,
        /// Row under the pointer.
        request_id: RequestId,
    },
    /// Pointer left a row.
    Unhover {
        /// Queue showing the row.
        queue: QueueKind,
        /// Row the pointer left.
        request_id: RequestId,
    },
    /// Reload every queue now.
    Refresh,
    /// Switch to the pull or return tab.
    ShowScanForm(ScanForm),
    /// A key went down somewhere on the page.
    KeyDown(u32),
}

/// How a handled action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action ran.
    Completed,
    /// Nothing to do: blank input, unknown row, or a declined dialog.
    Skipped,
}

/// Builds a [`DeskAction`] from the arguments following its name.
pub type ActionBuilder = fn(&[&str]) -> Result<DeskAction, DeskError>;

/// Binds action names to action builders.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    builders: HashMap<&'static str, ActionBuilder>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// Registers every archives-room action.
    #[must_use]
    pub fn new() -> Self {
        let entries: [(&'static str, ActionBuilder); 12] = [
            ("mark-as-pulled", |args| {
                Ok(DeskAction::MarkAsPulled {
                    identifier: args.join(" "),
                })
            }),
            ("mark-as-returned", |args| {
                Ok(DeskAction::MarkAsReturned {
                    identifier: args.join(" "),
                })
            }),
            ("assign-to-pull", |args| {
                expect_no_args("assign-to-pull", args)?;
                Ok(DeskAction::Assign(AssignmentKind::Pull))
            }),
            ("assign-to-create", |args| {
                expect_no_args("assign-to-create", args)?;
                Ok(DeskAction::Assign(AssignmentKind::Create))
            }),
            ("mergeId", |args| {
                single_arg("mergeId", args).map(|id| DeskAction::ConfirmMerge(MergeRequestId::new(id)))
            }),
            ("cancel-request", |args| {
                let (queue, request_id) = queue_and_request("cancel-request", args)?;
                Ok(DeskAction::CancelRequest { queue, request_id })
            }),
            ("print-label", |args| {
                single_arg("print-label", args).map(|id| DeskAction::PrintLabel(RequestId::new(id)))
            }),
            ("print-label-set", |args| {
                single_arg("print-label-set", args)
                    .map(|id| DeskAction::PrintLabelSet(RequestId::new(id)))
            }),
            ("select", |args| {
                let (queue, request_id) = queue_and_request("select", args)?;
                Ok(DeskAction::Select { queue, request_id })
            }),
            ("hover", |args| {
                let (queue, request_id) = queue_and_request("hover", args)?;
                Ok(DeskAction::Hover { queue, request_id })
            }),
            ("unhover", |args| {
                let (queue, request_id) = queue_and_request("unhover", args)?;
                Ok(DeskAction::Unhover { queue, request_id })
            }),
            ("refresh", |args| {
                expect_no_args("refresh", args)?;
                Ok(DeskAction::Refresh)
            }),
        ];

        Self {
            builders: entries.into_iter().collect(),
        }
    }

    /// Returns the builder bound to `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ActionBuilder> {
        self.builders.get(name).copied()
    }

    /// Registered action names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.builders.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Parses a command line of the form `name arg...`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::InvalidCommand`] for blank lines, unknown names,
    /// and malformed arguments.
    pub fn parse_line(&self, line: &str) -> Result<DeskAction, DeskError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(invalid("empty command"));
        };
        let args: Vec<&str> = words.collect();
        let builder = self
            .lookup(name)
            .ok_or_else(|| invalid(format!("unknown action `{name}`")))?;
        builder(&args)
    }
}

fn invalid(message: impl Into<String>) -> DeskError {
    DeskError::InvalidCommand {
        message: message.into(),
    }
}

fn expect_no_args(name: &str, args: &[&str]) -> Result<(), DeskError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(invalid(format!("`{name}` takes no arguments")))
    }
}

fn single_arg<'a>(name: &str, args: &[&'a str]) -> Result<&'a str, DeskError> {
    match args {
        [value] => Ok(*value),
        _ => Err(invalid(format!("usage: {name} <id>"))),
    }
}

fn queue_and_request(name: &str, args: &[&str]) -> Result<(QueueKind, RequestId), DeskError> {
    let [queue_label, request_id] = args else {
        return Err(invalid(format!("usage: {name} <queue> <request-id>")));
    };
    let queue = QueueKind::from_label(queue_label)
        .ok_or_else(|| invalid(format!("unknown queue `{queue_label}`")))?;
    Ok((queue, RequestId::new(*request_id)))
}

/// A button that submits a batch and must not be pressed twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchControl {
    name: &'static str,
    enabled: bool,
}

impl BatchControl {
    /// Creates an enabled control.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            enabled: true,
        }
    }

    /// Control name shown in messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true when the control accepts a press.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Blocks further presses until [`BatchControl::enable`].
    pub const fn disable(&mut self) {
        self.enabled = false;
    }

    /// Accepts presses again.
    pub const fn enable(&mut self) {
        self.enabled = true;
    }
}

impl ArchivesRoom {
    /// Routes an action to its handler and runs it to completion.
    ///
    /// # Errors
    ///
    /// Returns the handler's error. Remote failures have already been shown
    /// to the user through the notifier by the time they are returned.
    pub async fn dispatch(&mut self, action: DeskAction) -> Result<ActionOutcome, DeskError> {
        tracing::debug!(?action, "dispatching desk action");
        match action {
            DeskAction::MarkAsPulled { identifier } => {
                self.scan_forms_mut().set_input(ScanForm::Pulled, identifier);
                self.submit_scan(ScanForm::Pulled).await
            }
            DeskAction::MarkAsReturned { identifier } => {
                self.scan_forms_mut().set_input(ScanForm::Returned, identifier);
                self.submit_scan(ScanForm::Returned).await
            }
            DeskAction::Assign(kind) => self.assign_selected(kind).await,
            DeskAction::ConfirmMerge(merge_id) => self.confirm_merge(&merge_id).await,
            DeskAction::CancelRequest { queue, request_id } => {
                self.cancel_request(queue, &request_id).await
            }
            DeskAction::PrintLabel(request_id) => self.print_label(&request_id).await,
            DeskAction::PrintLabelSet(request_id) => self.print_label_set(&request_id).await,
            DeskAction::Select { queue, request_id } => Ok(completed_if(
                self.queue_mut(queue).toggle_selection(&request_id),
            )),
            DeskAction::Hover { queue, request_id } => {
                Ok(completed_if(self.queue_mut(queue).hover(&request_id)))
            }
            DeskAction::Unhover { queue, request_id } => {
                Ok(completed_if(self.queue_mut(queue).unhover(&request_id)))
            }
            DeskAction::Refresh => {
                self.refresh_all_queues().await;
                Ok(ActionOutcome::Completed)
            }
            DeskAction::ShowScanForm(form) => {
                self.scan_forms_mut().show(form);
                Ok(ActionOutcome::Completed)
            }
            DeskAction::KeyDown(key_code) => Ok(completed_if(
                self.scan_forms_mut().handle_key(key_code).is_some(),
            )),
        }
    }
}

const fn completed_if(handled: bool) -> ActionOutcome {
    if handled {
        ActionOutcome::Completed
    } else {
        ActionOutcome::Skipped
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
