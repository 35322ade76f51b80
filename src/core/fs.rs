//! Directory listing for the open-file dialog.
//!
//! Only the immediate children of a directory are read, via the [`ignore`]
//! walker capped at depth 1.  `.gitignore` rules are not applied: a dialog
//! should show every file the user could pick.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ignore::WalkBuilder;

/// Which files the dialog shows.  Directories are always listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFilter {
    #[default]
    Json,
    All,
}

impl FileFilter {
    pub fn label(self) -> &'static str {
        match self {
            FileFilter::Json => "JSON files (*.json)",
            FileFilter::All => "All files (*.*)",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FileFilter::Json => FileFilter::All,
            FileFilter::All => FileFilter::Json,
        }
    }

    fn accepts(self, meta: &EntryMeta) -> bool {
        match self {
            FileFilter::All => true,
            FileFilter::Json => meta.extension.as_deref() == Some("json"),
        }
    }
}

/// Lightweight metadata kept per listed entry.
#[derive(Debug, Clone)]
pub struct EntryMeta {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// Lower-cased extension, `None` for extensionless files.
    pub extension: Option<String>,
}

impl EntryMeta {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: meta.modified().ok(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase()),
        })
    }
}

/// A row of the open dialog.
#[derive(Debug, Clone)]
pub enum DialogEntry {
    /// Leads to the parent of the listed directory.
    Parent(PathBuf),
    Entry(EntryMeta),
}

impl DialogEntry {
    pub fn path(&self) -> &Path {
        match self {
            DialogEntry::Parent(p) => p,
            DialogEntry::Entry(meta) => &meta.path,
        }
    }

    pub fn is_dir(&self) -> bool {
        match self {
            DialogEntry::Parent(_) => true,
            DialogEntry::Entry(meta) => meta.is_dir,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            DialogEntry::Parent(_) => "../".to_string(),
            DialogEntry::Entry(meta) if meta.is_dir => format!("{}/", meta.name),
            DialogEntry::Entry(meta) => meta.name.clone(),
        }
    }
}

/// List `dir` for the dialog: `..` first, then directories, then the files
/// `filter` accepts.  Each group is sorted case-insensitively.
pub fn list_dir(
    dir: &Path,
    filter: FileFilter,
    show_hidden: bool,
) -> anyhow::Result<Vec<DialogEntry>> {
    // Surface unreadable directories as an error instead of an empty list.
    std::fs::read_dir(dir)?;

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1)) // only immediate children
        .hidden(!show_hidden)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .build();

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in walker.flatten() {
        let path = entry.path();
        // WalkBuilder yields the directory itself first.
        if path == dir {
            continue;
        }
        let Ok(meta) = EntryMeta::from_path(path) else {
            continue;
        };
        if meta.is_dir {
            dirs.push(meta);
        } else if filter.accepts(&meta) {
            files.push(meta);
        }
    }

    dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let mut out = Vec::with_capacity(dirs.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        out.push(DialogEntry::Parent(parent.to_path_buf()));
    }
    out.extend(dirs.into_iter().map(DialogEntry::Entry));
    out.extend(files.into_iter().map(DialogEntry::Entry));
    Ok(out)
}
