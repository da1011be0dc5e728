/// UI widgets for PngSweep.

pub mod root_picker;
pub mod status_bar;
pub mod toolbar;
