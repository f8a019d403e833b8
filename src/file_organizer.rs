/// File organization system for moving files into category and date directories.
///
/// This module enumerates the top-level files of a source directory, sorts
/// them by modification time, and moves each one to
/// `<destination>/<category>/<dd-mm-yyyy>/<filename>`, renaming on collision.
/// Failures on individual files are recorded and never abort the run.
use crate::file_category::{Category, LabelSet};
use crate::prompt::{Prompt, Reporter};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Format of the date directory: day, month, four-digit year.
pub const DATE_BUCKET_FORMAT: &str = "%d-%m-%Y";

/// Default highest numeric suffix tried before a name collision is reported
/// as a failure.
pub const MAX_COLLISION_SUFFIX: u32 = 9_999;

/// A regular file found in the source directory.
///
/// This is a snapshot taken at enumeration time; later changes to the file
/// are not reflected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path of the file in the source directory.
    pub path: PathBuf,
    /// The final path component.
    pub file_name: OsString,
    /// Extension including its leading `.`, or empty.
    pub extension: String,
    /// Last modification time.
    pub modified: SystemTime,
}

impl FileEntry {
    /// Builds an entry from a directory listing item.
    ///
    /// Returns `Ok(None)` for anything that is not a regular file. Symlinks
    /// are not followed, so a link to a file is skipped as well.
    pub fn from_dir_entry(entry: &DirEntry) -> std::io::Result<Option<Self>> {
        if !entry.file_type()?.is_file() {
            return Ok(None);
        }
        let modified = entry.metadata()?.modified()?;
        Ok(Some(Self::new(entry.path(), modified)))
    }

    /// Builds an entry from a path and a modification time.
    pub fn new(path: PathBuf, modified: SystemTime) -> Self {
        let file_name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            file_name,
            extension,
            modified,
        }
    }

    /// The category this file belongs to.
    pub fn category(&self) -> Category {
        Category::of_path(&self.path)
    }

    /// The modification time in the local timezone.
    ///
    /// Fails with [`OrganizeError::Timestamp`] when the time cannot be
    /// represented as a calendar date.
    pub fn modified_local(&self) -> OrganizeResult<DateTime<Local>> {
        local_time(self.modified).ok_or_else(|| OrganizeError::Timestamp {
            path: self.path.clone(),
        })
    }
}

/// Converts a timestamp to local time.
///
/// Returns `None` for timestamps outside chrono's range. Some filesystems
/// (tmpfs among them) store such modification times without complaint.
pub fn local_time(time: SystemTime) -> Option<DateTime<Local>> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_nanos()),
        Err(e) => {
            let before = e.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => (-secs, 0),
                n => (secs.checked_neg()?.checked_sub(1)?, 1_000_000_000 - n),
            }
        }
    };
    DateTime::from_timestamp(secs, nanos).map(|utc| utc.with_timezone(&Local))
}

/// Formats a timestamp as its local calendar day, `dd-mm-yyyy`.
///
/// Returns `None` when the timestamp has no calendar date.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use datetidy::file_organizer::date_bucket;
/// use std::time::SystemTime;
///
/// let noon = Local.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();
/// assert_eq!(date_bucket(SystemTime::from(noon)).as_deref(), Some("01-05-2023"));
/// ```
pub fn date_bucket(time: SystemTime) -> Option<String> {
    local_time(time).map(|local| local.format(DATE_BUCKET_FORMAT).to_string())
}

/// How destination directories are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Layout {
    /// `<destination>/<category>/<dd-mm-yyyy>/`
    #[default]
    CategoryDate,
    /// `<destination>/<dd-mm-yyyy>/`
    DateOnly,
}

impl Layout {
    /// Computes the directory a file should land in.
    pub fn target_dir(
        &self,
        destination: &Path,
        category: Category,
        labels: LabelSet,
        bucket: &str,
    ) -> PathBuf {
        match self {
            Layout::CategoryDate => destination.join(category.dir_name(labels)).join(bucket),
            Layout::DateOnly => destination.join(bucket),
        }
    }
}

/// Options controlling an organization run.
#[derive(Debug, Clone, Copy)]
pub struct OrganizeOptions {
    /// Directory layout under the destination.
    pub layout: Layout,
    /// Category directory labels.
    pub labels: LabelSet,
    /// If true, only compute where files would go.
    pub dry_run: bool,
    /// Highest `_N` suffix tried when a name is taken.
    pub collision_limit: u32,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            labels: LabelSet::default(),
            dry_run: false,
            collision_limit: MAX_COLLISION_SUFFIX,
        }
    }
}

/// A file paired with the place it is going to.
#[derive(Debug, Clone)]
pub struct MovePlan {
    pub entry: FileEntry,
    pub category: Category,
    pub modified: DateTime<Local>,
    pub destination: PathBuf,
}

impl MovePlan {
    fn into_record(self) -> MoveRecord {
        MoveRecord {
            bucket: self.modified.format(DATE_BUCKET_FORMAT).to_string(),
            modified: self.modified,
            source: self.entry.path,
            destination: self.destination,
            category: self.category,
        }
    }
}

/// A completed (or, in a preview, planned) move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    /// Where the file was.
    pub source: PathBuf,
    /// Where the file is now.
    pub destination: PathBuf,
    pub category: Category,
    /// The date directory name.
    pub bucket: String,
    /// Modification time the bucket was derived from.
    pub modified: DateTime<Local>,
}

/// A file that could not be processed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The source held no regular files; nothing was asked or moved.
    NothingToDo,
    /// The user declined the confirmation; nothing was moved.
    Cancelled,
    /// Every file was attempted.
    Completed,
    /// Destinations were computed but nothing was moved.
    Previewed,
}

/// Summary of an organization run.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport {
    pub status: RunStatus,
    /// Number of regular files found in the source.
    pub total_files: usize,
    /// Files moved, in the order they were moved.
    pub moved: Vec<MoveRecord>,
    /// Moves a preview would perform.
    pub planned: Vec<MoveRecord>,
    /// Files whose move failed.
    pub failed: Vec<FileFailure>,
    /// Directory entries that could not be inspected during enumeration.
    pub skipped: Vec<FileFailure>,
}

impl OutcomeReport {
    fn new(status: RunStatus, total_files: usize, skipped: Vec<FileFailure>) -> Self {
        Self {
            status,
            total_files,
            moved: Vec::new(),
            planned: Vec::new(),
            failed: Vec::new(),
            skipped,
        }
    }

    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Returns true if no file failed or was skipped.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Counts moved (or planned, for a preview) files per category.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let records = match self.status {
            RunStatus::Previewed => &self.planned,
            _ => &self.moved,
        };
        let mut counts = BTreeMap::new();
        for record in records {
            *counts.entry(record.category).or_insert(0) += 1;
        }
        counts
    }
}

/// Which folder a selection was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderRole {
    Source,
    Destination,
}

impl std::fmt::Display for FolderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FolderRole::Source => write!(f, "source"),
            FolderRole::Destination => write!(f, "destination"),
        }
    }
}

/// Errors that can occur during file organization.
#[derive(Debug)]
pub enum OrganizeError {
    /// No folder was chosen.
    Selection { which: FolderRole },
    /// A destination directory could not be created.
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The source directory could not be listed.
    Enumeration {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file could not be moved.
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// A file's modification time has no calendar date.
    Timestamp { path: PathBuf },
    /// The interactive prompt itself failed.
    Prompt { reason: String },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selection { which } => write!(f, "No {} folder selected", which),
            Self::DirectoryCreate { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::Enumeration { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::Move { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::Timestamp { path } => {
                write!(
                    f,
                    "Modification time of {} is outside the supported date range",
                    path.display()
                )
            }
            Self::Prompt { reason } => write!(f, "Prompt failed: {}", reason),
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryCreate { source, .. }
            | Self::Enumeration { source, .. }
            | Self::Move { source, .. } => Some(source),
            Self::Selection { .. } | Self::Timestamp { .. } | Self::Prompt { .. } => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// True if anything, including a dangling symlink, occupies `path`.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// `stem_N.ext` for a file name `stem.ext`.
fn suffixed_name(file_name: &OsStr, n: u32) -> OsString {
    let path = Path::new(file_name);
    let mut name = path
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!("_{}", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Picks the first free name for `file_name` inside `dir`.
///
/// Tries `file_name` itself, then `stem_1.ext`, `stem_2.ext`, and so on up to
/// `stem_<limit>.ext`. `is_taken` decides whether a candidate is in use.
/// Returns `None` if every candidate is taken.
///
/// The check and the later rename are separate steps; another process
/// creating the same name in between is not detected.
pub fn resolve_collision(
    dir: &Path,
    file_name: &OsStr,
    limit: u32,
    is_taken: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    let candidate = dir.join(file_name);
    if !is_taken(&candidate) {
        return Some(candidate);
    }
    (1..=limit)
        .map(|n| dir.join(suffixed_name(file_name, n)))
        .find(|candidate| !is_taken(candidate))
}

/// Organizes files from a source directory into a destination tree.
///
/// One run is a single synchronous pass: ensure the destination exists, list
/// the source, ask for confirmation, then move files oldest first.
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    options: OrganizeOptions,
}

impl FileOrganizer {
    /// Creates an organizer with the given options.
    pub fn new(options: OrganizeOptions) -> Self {
        Self { options }
    }

    /// Runs a full organization.
    ///
    /// The source is listed first. An empty source ends the run without
    /// touching the destination; otherwise the destination is created before
    /// confirmation is asked.
    ///
    /// Fatal errors (destination cannot be created, source cannot be read,
    /// prompt failure) are returned as `Err`. Per-file failures are reported
    /// to `reporter` and collected in the returned report.
    ///
    /// When the options request a dry run this is the same as [`Self::preview`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use datetidy::file_organizer::FileOrganizer;
    /// use datetidy::prompt::{ConsolePrompt, SilentReporter};
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::default();
    /// let report = organizer.organize(
    ///     Path::new("/path/to/inbox"),
    ///     Path::new("/path/to/archive"),
    ///     &mut ConsolePrompt::new(),
    ///     &mut SilentReporter,
    /// );
    /// match report {
    ///     Ok(report) => println!("Moved {} files", report.moved_count()),
    ///     Err(e) => eprintln!("Error: {}", e),
    /// }
    /// ```
    pub fn organize(
        &self,
        source: &Path,
        destination: &Path,
        prompt: &mut dyn Prompt,
        reporter: &mut dyn Reporter,
    ) -> OrganizeResult<OutcomeReport> {
        if self.options.dry_run {
            return self.preview(source, destination);
        }

        let (mut entries, skipped) = Self::enumerate(source)?;
        if entries.is_empty() {
            log::debug!("No files found in {}", source.display());
            return Ok(OutcomeReport::new(RunStatus::NothingToDo, 0, skipped));
        }

        Self::ensure_dir(destination)?;

        let paths: Vec<PathBuf> = entries.iter().map(|e| e.path.clone()).collect();
        if !prompt.confirm(&paths)? {
            return Ok(OutcomeReport::new(
                RunStatus::Cancelled,
                entries.len(),
                skipped,
            ));
        }

        Self::sort_by_modified(&mut entries);

        let mut report = OutcomeReport::new(RunStatus::Completed, entries.len(), skipped);
        reporter.run_started(entries.len());
        for entry in entries {
            let source_path = entry.path.clone();
            match self.move_with_record(entry, destination) {
                Ok(record) => {
                    reporter.file_moved(&record);
                    report.moved.push(record);
                }
                Err(e) => {
                    log::warn!("{}", e);
                    let failure = FileFailure {
                        path: source_path,
                        reason: e.to_string(),
                    };
                    reporter.file_failed(&failure);
                    report.failed.push(failure);
                }
            }
        }
        reporter.run_finished();

        Ok(report)
    }

    /// Computes where every file would go without touching the filesystem.
    ///
    /// No directories are created, nothing is moved, and no confirmation is
    /// asked. Planned destinations are distinct from each other and from
    /// anything already present.
    pub fn preview(&self, source: &Path, destination: &Path) -> OrganizeResult<OutcomeReport> {
        let (mut entries, skipped) = Self::enumerate(source)?;
        if entries.is_empty() {
            return Ok(OutcomeReport::new(RunStatus::NothingToDo, 0, skipped));
        }

        Self::sort_by_modified(&mut entries);

        let mut report = OutcomeReport::new(RunStatus::Previewed, entries.len(), skipped);
        let mut reserved: HashSet<PathBuf> = HashSet::new();
        for entry in entries {
            let modified = match entry.modified_local() {
                Ok(modified) => modified,
                Err(e) => {
                    log::warn!("{}", e);
                    report.failed.push(FileFailure {
                        path: entry.path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let category = entry.category();
            let target_dir = self.target_dir(destination, category, &modified);
            let resolved = resolve_collision(
                &target_dir,
                &entry.file_name,
                self.options.collision_limit,
                |candidate| reserved.contains(candidate) || entry_exists(candidate),
            );
            match resolved {
                Some(path) => {
                    reserved.insert(path.clone());
                    let plan = MovePlan {
                        entry,
                        category,
                        modified,
                        destination: path,
                    };
                    report.planned.push(plan.into_record());
                }
                None => report.failed.push(FileFailure {
                    reason: self.exhausted_error(&entry.path, &target_dir).to_string(),
                    path: entry.path,
                }),
            }
        }

        Ok(report)
    }

    /// Moves one file into its category/date directory and records the move.
    ///
    /// Creates the target directory if needed and picks a free name. The
    /// source file is renamed, never copied, so a move across filesystems
    /// fails with the underlying error.
    pub fn move_with_record(
        &self,
        entry: FileEntry,
        destination: &Path,
    ) -> OrganizeResult<MoveRecord> {
        let plan = self.plan(entry, destination)?;

        fs::rename(&plan.entry.path, &plan.destination).map_err(|e| OrganizeError::Move {
            from: plan.entry.path.clone(),
            to: plan.destination.clone(),
            source: e,
        })?;

        Ok(plan.into_record())
    }

    /// Creates the target directory for `entry` and resolves its final path.
    fn plan(&self, entry: FileEntry, destination: &Path) -> OrganizeResult<MovePlan> {
        let modified = entry.modified_local()?;
        let category = entry.category();
        let target_dir = self.target_dir(destination, category, &modified);
        Self::ensure_dir(&target_dir)?;

        let path = resolve_collision(
            &target_dir,
            &entry.file_name,
            self.options.collision_limit,
            entry_exists,
        )
        .ok_or_else(|| self.exhausted_error(&entry.path, &target_dir))?;
        if path.file_name() != Some(entry.file_name.as_os_str()) {
            log::debug!(
                "{} already taken, using {}",
                target_dir.join(&entry.file_name).display(),
                path.display()
            );
        }

        Ok(MovePlan {
            entry,
            category,
            modified,
            destination: path,
        })
    }

    fn target_dir(
        &self,
        destination: &Path,
        category: Category,
        modified: &DateTime<Local>,
    ) -> PathBuf {
        self.options.layout.target_dir(
            destination,
            category,
            self.options.labels,
            &modified.format(DATE_BUCKET_FORMAT).to_string(),
        )
    }

    fn exhausted_error(&self, source: &Path, target_dir: &Path) -> OrganizeError {
        OrganizeError::Move {
            from: source.to_path_buf(),
            to: target_dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("no free name after {} attempts", self.options.collision_limit),
            ),
        }
    }

    /// Creates `dir` and any missing ancestors.
    fn ensure_dir(dir: &Path) -> OrganizeResult<()> {
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| OrganizeError::DirectoryCreate {
            path: dir.to_path_buf(),
            source: e,
        })?;
        log::debug!("Created directory {}", dir.display());
        Ok(())
    }

    /// Lists the regular files directly inside `source`.
    ///
    /// Directories, symlinks, and special files are left out. Items that
    /// cannot be inspected are returned separately as skipped.
    pub fn enumerate(source: &Path) -> OrganizeResult<(Vec<FileEntry>, Vec<FileFailure>)> {
        let read_dir = fs::read_dir(source).map_err(|e| OrganizeError::Enumeration {
            path: source.to_path_buf(),
            source: e,
        })?;

        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        for item in read_dir {
            let dir_entry = match item {
                Ok(dir_entry) => dir_entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", source.display(), e);
                    skipped.push(FileFailure {
                        path: source.to_path_buf(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            match FileEntry::from_dir_entry(&dir_entry) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping {}: {}", dir_entry.path().display(), e);
                    skipped.push(FileFailure {
                        path: dir_entry.path(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok((entries, skipped))
    }

    /// Oldest first. The sort is stable, so equal timestamps keep listing order.
    fn sort_by_modified(entries: &mut [FileEntry]) {
        entries.sort_by_key(|entry| entry.modified);
    }
}
