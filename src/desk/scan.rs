//! Barcode scan inputs for marking records as pulled or returned.
//!
//! Only one scan form is visible at a time (the clerk switches between the
//! "pull" and "return" tabs). Any digit or letter typed anywhere on the page
//! moves focus to the visible form so a scanner can be used without clicking
//! first.

use std::fmt;

/// Lowest key code that moves focus to the scan input (`0`).
pub const FIRST_FOCUS_KEY: u32 = 48;
/// Highest key code that moves focus to the scan input (`Z`).
pub const LAST_FOCUS_KEY: u32 = 90;

/// The two scan inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanForm {
    /// Marks the scanned record as pulled and sent.
    #[default]
    Pulled,
    /// Marks the scanned record as returned to the archives.
    Returned,
}

impl ScanForm {
    /// Action name of the form.
    #[must_use]
    pub const fn action_name(self) -> &'static str {
        match self {
            Self::Pulled => "mark-as-pulled",
            Self::Returned => "mark-as-returned",
        }
    }
}

impl fmt::Display for ScanForm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.action_name())
    }
}

/// Input state of both scan forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanForms {
    pulled: String,
    returned: String,
    visible: ScanForm,
    focused: Option<ScanForm>,
}

impl ScanForms {
    /// Form currently shown.
    #[must_use]
    pub const fn visible(&self) -> ScanForm {
        self.visible
    }

    /// Form holding keyboard focus, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<ScanForm> {
        self.focused
    }

    /// Switches tabs. Focus does not follow; the next key press moves it.
    pub fn show(&mut self, form: ScanForm) {
        if self.visible != form {
            self.focused = None;
        }
        self.visible = form;
    }

    /// Raw contents of a form's input box.
    #[must_use]
    pub fn input(&self, form: ScanForm) -> &str {
        match form {
            ScanForm::Pulled => &self.pulled,
            ScanForm::Returned => &self.returned,
        }
    }

    fn input_mut(&mut self, form: ScanForm) -> &mut String {
        match form {
            ScanForm::Pulled => &mut self.pulled,
            ScanForm::Returned => &mut self.returned,
        }
    }

    /// Replaces a form's input box contents.
    pub fn set_input(&mut self, form: ScanForm, value: impl Into<String>) {
        *self.input_mut(form) = value.into();
    }

    /// Empties a form's input box.
    pub fn clear(&mut self, form: ScanForm) {
        self.input_mut(form).clear();
    }

    /// Trimmed identifier typed into a form, or `None` when it is blank.
    #[must_use]
    pub fn identifier(&self, form: ScanForm) -> Option<String> {
        let trimmed = self.input(form).trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    /// Routes a key press. Digits and letters focus the visible form and
    /// return it; every other key is ignored.
    pub fn handle_key(&mut self, key_code: u32) -> Option<ScanForm> {
        if !(FIRST_FOCUS_KEY..=LAST_FOCUS_KEY).contains(&key_code) {
            return None;
        }
        self.focused = Some(self.visible);
        self.focused
    }
}
