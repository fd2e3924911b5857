/// Rows from the bottom of the jobs list at which the next page is requested.
pub const LOAD_MORE_MARGIN: usize = 5;

pub const TITLE_JOBS: &str = "Jobs";
pub const TITLE_ARTIFACTS: &str = "Artifacts";
pub const TITLE_FILTER: &str = "Filter";
pub const TITLE_UPLOAD: &str = "Upload sequence file";
pub const TITLE_SUBMIT: &str = "Submit analysis";

pub const HELP_LINE: &str =
    "q quit · tab pane · ↑↓ move · enter select · u upload · s submit · f filter · \
     c cancel · d delete · o download · r reconnect · t theme";
