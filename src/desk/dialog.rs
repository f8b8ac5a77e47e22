//! Confirmation dialogs guarding destructive actions.
//!
//! A dialog is asked synchronously; the desk keeps the currently open
//! request in a [`DialogSlot`] so a second open replaces the first instead of
//! stacking.

use std::io::{BufRead, Write};
use std::sync::Mutex;

use crate::archives::models::RequestId;

/// Selector of the dialog confirming a request cancellation.
pub const CANCEL_REQUEST_DIALOG: &str = "#cancel-paper-record-request-dialog";

/// Selector of the dialog confirming a paper record request from the patient
/// dashboard.
pub const REQUEST_PAPER_RECORD_DIALOG: &str = "#request-paper-record-dialog";

/// The user's answer to a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    /// Run the guarded action.
    Confirm,
    /// Close the dialog without doing anything.
    Cancel,
}

/// What a dialog asks and which dialog asks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    /// Identifies the dialog template.
    pub selector: String,
    /// Question shown to the user.
    pub prompt: String,
}

impl DialogRequest {
    /// Creates a dialog request.
    #[must_use]
    pub fn new(selector: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            prompt: prompt.into(),
        }
    }

    /// Dialog asking whether to cancel one record request.
    #[must_use]
    pub fn cancel_request(request_id: &RequestId, patient_name: Option<&str>) -> Self {
        let prompt = patient_name.map_or_else(
            || format!("Cancel paper record request {request_id}?"),
            |name| format!("Cancel paper record request {request_id} for {name}?"),
        );
        Self::new(CANCEL_REQUEST_DIALOG, prompt)
    }

    /// Dialog asking whether to send a patient's paper record to a location.
    #[must_use]
    pub fn request_paper_record(patient_id: &str, location_id: &str) -> Self {
        Self::new(
            REQUEST_PAPER_RECORD_DIALOG,
            format!("Request the paper record of patient {patient_id} for location {location_id}?"),
        )
    }
}

/// Asks the user to confirm or cancel an action.
pub trait ConfirmationDialog: Send + Sync {
    /// Shows the dialog and waits for the answer.
    fn ask(&self, request: &DialogRequest) -> DialogChoice;
}

/// Confirms every dialog without asking; used by `--assume-yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl ConfirmationDialog for AutoConfirm {
    fn ask(&self, request: &DialogRequest) -> DialogChoice {
        tracing::debug!(selector = %request.selector, "dialog confirmed automatically");
        DialogChoice::Confirm
    }
}

/// Cancels every dialog; used when nobody is around to answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclineAll;

impl ConfirmationDialog for DeclineAll {
    fn ask(&self, request: &DialogRequest) -> DialogChoice {
        tracing::info!(
            selector = %request.selector,
            "dialog declined; pass --assume-yes to confirm unattended"
        );
        DialogChoice::Cancel
    }
}

/// Asks on a writer and reads a `y`/`n` answer from a reader.
///
/// Anything other than `y` or `yes` (case-insensitive) cancels, including a
/// read failure or end of input.
#[derive(Debug)]
pub struct PromptDialog<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> PromptDialog<R, W> {
    /// Wraps the reader and writer.
    #[must_use]
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }
}

impl<R, W> ConfirmationDialog for PromptDialog<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn ask(&self, request: &DialogRequest) -> DialogChoice {
        let Ok(mut guard) = self.io.lock() else {
            return DialogChoice::Cancel;
        };
        let (reader, writer) = &mut *guard;

        if write!(writer, "{} [y/N] ", request.prompt)
            .and_then(|()| writer.flush())
            .is_err()
        {
            return DialogChoice::Cancel;
        }

        let mut answer = String::new();
        match reader.read_line(&mut answer) {
            Ok(_) if is_affirmative(&answer) => DialogChoice::Confirm,
            _ => DialogChoice::Cancel,
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    )
}

/// Tracks the dialog currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSlot {
    open: Option<DialogRequest>,
}

impl DialogSlot {
    /// Opens a dialog, replacing any dialog already open.
    ///
    /// Returns the replaced dialog, if any.
    pub fn open(&mut self, request: DialogRequest) -> Option<DialogRequest> {
        self.open.replace(request)
    }

    /// Closes the open dialog.
    pub fn close(&mut self) -> Option<DialogRequest> {
        self.open.take()
    }

    /// Dialog currently on screen.
    #[must_use]
    pub const fn current(&self) -> Option<&DialogRequest> {
        self.open.as_ref()
    }
}

/// Shows `request` in `slot`, asks `dialog`, closes the slot, and returns
/// whether the guarded action should run.
pub fn with_confirmation(
    slot: &mut DialogSlot,
    dialog: &dyn ConfirmationDialog,
    request: DialogRequest,
) -> bool {
    if let Some(previous) = slot.open(request.clone()) {
        tracing::debug!(selector = %previous.selector, "replacing open dialog");
    }
    let choice = dialog.ask(&request);
    slot.close();
    choice == DialogChoice::Confirm
}

/// Test doubles for confirmation dialogs.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{ConfirmationDialog, DialogChoice, DialogRequest};

    /// Dialog answering from a script and recording each request.
    ///
    /// Once the script runs out every further dialog is cancelled.
    #[derive(Debug, Default)]
    pub struct ScriptedDialog {
        answers: Mutex<VecDeque<DialogChoice>>,
        asked: Mutex<Vec<DialogRequest>>,
    }

    impl ScriptedDialog {
        /// Creates a dialog that answers with `answers` in order.
        #[must_use]
        pub fn new(answers: impl IntoIterator<Item = DialogChoice>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().collect()),
                asked: Mutex::new(Vec::new()),
            }
        }

        /// Requests shown so far.
        #[must_use]
        pub fn asked(&self) -> Vec<DialogRequest> {
            self.asked
                .lock()
                .map(|guard| guard.clone())
                .unwrap_or_default()
        }
    }

    impl ConfirmationDialog for ScriptedDialog {
        fn ask(&self, request: &DialogRequest) -> DialogChoice {
            if let Ok(mut guard) = self.asked.lock() {
                guard.push(request.clone());
            }
            self.answers
                .lock()
                .ok()
                .and_then(|mut guard| guard.pop_front())
                .unwrap_or(DialogChoice::Cancel)
        }
    }
}
