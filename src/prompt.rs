//! User interaction seams.
//!
//! The organizer never talks to a terminal directly. It asks a [`Prompt`] for
//! folders and for confirmation, and tells a [`Reporter`] about each file as
//! it is processed. The console implementations here use `dialoguer`; tests
//! plug in stubs that return canned answers.

use crate::file_organizer::{FileFailure, FolderRole, MoveRecord, OrganizeError, OrganizeResult};
use crate::output::OutputFormatter;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::path::PathBuf;

/// Asks the user for folders and for permission to proceed.
pub trait Prompt {
    /// Asks for a folder. `Ok(None)` means the user chose nothing.
    fn choose_folder(&mut self, role: FolderRole) -> OrganizeResult<Option<PathBuf>>;

    /// Shows the files about to be moved and asks whether to continue.
    fn confirm(&mut self, files: &[PathBuf]) -> OrganizeResult<bool>;
}

/// Receives per-file progress while a run executes.
///
/// Every method has an empty default so implementors only override what
/// they display.
pub trait Reporter {
    fn run_started(&mut self, _total: usize) {}
    fn file_moved(&mut self, _record: &MoveRecord) {}
    fn file_failed(&mut self, _failure: &FileFailure) {}
    fn run_finished(&mut self) {}
}

/// A reporter that discards everything.
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Terminal prompt backed by `dialoguer`.
pub struct ConsolePrompt {
    theme: ColorfulTheme,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for ConsolePrompt {
    fn choose_folder(&mut self, role: FolderRole) -> OrganizeResult<Option<PathBuf>> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(format!("Select the {} folder", role))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| OrganizeError::Prompt {
                reason: format!("Failed to read {} folder: {}", role, e),
            })?;

        folder_answer(&answer, role)
    }

    fn confirm(&mut self, files: &[PathBuf]) -> OrganizeResult<bool> {
        OutputFormatter::file_list("The following files will be moved:", files);

        Confirm::with_theme(&self.theme)
            .with_prompt("Do you want to continue?")
            .default(false)
            .interact()
            .map_err(|e| OrganizeError::Prompt {
                reason: format!("Failed to get user confirmation: {}", e),
            })
    }
}

/// Turns a typed folder answer into an absolute path; blank means none.
fn folder_answer(answer: &str, role: FolderRole) -> OrganizeResult<Option<PathBuf>> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    std::path::absolute(answer)
        .map(Some)
        .map_err(|e| OrganizeError::Prompt {
            reason: format!("Invalid {} folder {}: {}", role, answer, e),
        })
}

/// Wraps another prompt and answers every confirmation with yes.
///
/// Folder questions are still forwarded to the inner prompt.
pub struct AutoConfirm<P> {
    inner: P,
}

impl<P: Prompt> AutoConfirm<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Prompt> Prompt for AutoConfirm<P> {
    fn choose_folder(&mut self, role: FolderRole) -> OrganizeResult<Option<PathBuf>> {
        self.inner.choose_folder(role)
    }

    fn confirm(&mut self, files: &[PathBuf]) -> OrganizeResult<bool> {
        log::debug!("Confirmation skipped for {} files", files.len());
        Ok(true)
    }
}
