//! Selection controller: the single writer of session state.

mod controller;
mod state;

pub use controller::SelectionController;
pub use state::*;
