//! SeqConsole core: pure state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{
    date_component, ArtifactKind, ArtifactRecord, JobFilter, JobKey, JobRecord, JobStatus,
};
pub use msg::Msg;
pub use state::{AppState, PreferencesSnapshot, StreamStatus, Theme};
pub use update::update;
pub use view_model::{AppViewModel, JobRowView};
