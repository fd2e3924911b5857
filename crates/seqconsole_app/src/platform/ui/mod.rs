pub mod constants;
mod input;
pub mod layout;
pub mod render;

pub use input::{FilterForm, Outcome, Overlay, Pane, UiState};
