//! datetidy - move files into category and date folders
//!
//! This library lists the files at the top level of a source directory,
//! classifies each one by extension, and moves it under
//! `<destination>/<category>/<dd-mm-yyyy>/` based on its last modification
//! date, renaming on name collisions. User interaction (folder choice,
//! confirmation, progress lines) goes through the traits in [`prompt`].

pub mod cli;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod prompt;

pub use file_category::{Category, LabelSet, classify};
pub use file_organizer::{
    FileEntry, FileOrganizer, Layout, MovePlan, OrganizeError, OrganizeOptions, OutcomeReport,
    RunStatus,
};
pub use prompt::{Prompt, Reporter};

pub use cli::{Args, run_cli};
