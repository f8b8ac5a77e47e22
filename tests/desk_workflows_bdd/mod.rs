//! Support code for the desk workflow behavioural tests.

mod state;

pub(crate) use state::{DeskState, record};
