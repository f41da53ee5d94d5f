/// Documentation structure builder.
///
/// Walks the documentation root exactly two levels deep:
/// `root/<section>/<file>.md` and `root/<section>/<subsection>/<file>.md`.
/// Markdown files directly under the root and deeper folders are not modeled.
///
/// Every per-entry failure (listing, metadata, read, invalid UTF-8) is logged
/// and the entry skipped; the walk never aborts. Symlinks are not followed.
/// Only the leading lines of each file are read for metadata.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::parser::{extract_metadata, title_from_name, LEADING_LINES};
use crate::paths;
use docs_common::docs_api::{DocFile, DocSection, DocSubsection, DocsStructure};

const TUTORIAL_MARKER: &str = "tutorial";

/// Depth of section folders below the root; subsections sit one deeper.
const SECTION_DEPTH: usize = 1;
const SUBSECTION_DEPTH: usize = 2;
/// Files inside subsections are the deepest modeled entries.
const MAX_DEPTH: usize = 3;

/// Display names for folders whose title-cased name reads poorly.
const KNOWN_FOLDER_TITLES: &[(&str, &str)] = &[
    ("getting-started", "Getting Started"),
    ("api", "API Reference"),
    ("cli", "CLI"),
    ("faq", "FAQ"),
    ("tutorials", "Tutorials"),
    ("guides", "Guides"),
    ("examples", "Examples"),
];

/// Scan `root` into a fresh `DocsStructure`.
///
/// A missing or non-directory root yields an empty structure.
pub fn build_structure(root: &Path) -> DocsStructure {
    let root = paths::normalize(root);
    match std::fs::metadata(&root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            warn!(root = %root.display(), "documentation root is not a directory");
            return DocsStructure::default();
        }
        Err(e) => {
            warn!(root = %root.display(), error = %e, "documentation root unavailable");
            return DocsStructure::default();
        }
    }

    let sections: Vec<DocSection> = walk_tree(&root)
        .into_iter()
        .filter_map(scan_section)
        .collect();

    let mut structure = DocsStructure {
        total_tutorials: sections.iter().map(count_tutorials).sum(),
        sections,
        total_files: 0,
    };
    structure.total_files = structure.files().count();

    debug!(
        sections = structure.sections.len(),
        total_files = structure.total_files,
        total_tutorials = structure.total_tutorials,
        "documentation scan complete"
    );
    structure
}

fn is_tutorial(id: &str) -> bool {
    id.to_lowercase().contains(TUTORIAL_MARKER)
}

fn count_tutorials(section: &DocSection) -> usize {
    let subsection_files = |tutorial_only: bool| -> usize {
        section
            .subsections
            .iter()
            .filter(|sub| !tutorial_only || is_tutorial(&sub.id))
            .map(|sub| sub.files.len())
            .sum()
    };

    if is_tutorial(&section.id) {
        section.files.len() + subsection_files(false)
    } else {
        subsection_files(true)
    }
}

fn folder_title(id: &str) -> String {
    KNOWN_FOLDER_TITLES
        .iter()
        .find(|(folder, _)| folder.eq_ignore_ascii_case(id))
        .map(|(_, title)| title.to_string())
        .unwrap_or_else(|| title_from_name(id))
}

struct Entry {
    name: String,
    path: PathBuf,
    key: String,
}

struct FolderEntries {
    folder: Entry,
    files: Vec<Entry>,
}

struct SectionEntries {
    folder: Entry,
    files: Vec<Entry>,
    subsections: Vec<FolderEntries>,
}

/// Visible entries are kept; the root itself is always descended into.
fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || entry
            .file_name()
            .to_str()
            .is_some_and(|name| !paths::is_hidden(name))
}

/// Collect section folders, subsection folders and markdown files in name order.
///
/// The walk is pre-order and sorted, so every file arrives after the folder
/// that holds it.
fn walk_tree(root: &Path) -> Vec<SectionEntries> {
    let mut sections: Vec<SectionEntries> = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(SECTION_DEPTH)
        .max_depth(MAX_DEPTH)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_visible);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(path = %path, error = %e, "failed to read directory entry, skipping");
                continue;
            }
        };

        let file_type = entry.file_type();
        let is_doc = file_type.is_file() && paths::is_markdown(entry.path());
        if !file_type.is_dir() && !is_doc {
            continue;
        }

        let depth = entry.depth();
        let Some(item) = to_entry(root, entry) else {
            continue;
        };

        match (depth, file_type.is_dir()) {
            (SECTION_DEPTH, true) => sections.push(SectionEntries {
                folder: item,
                files: Vec::new(),
                subsections: Vec::new(),
            }),
            (SUBSECTION_DEPTH, true) => {
                if let Some(section) = sections.last_mut() {
                    section.subsections.push(FolderEntries {
                        folder: item,
                        files: Vec::new(),
                    });
                }
            }
            (SUBSECTION_DEPTH, false) => {
                if let Some(section) = sections
                    .last_mut()
                    .filter(|s| item.path.parent() == Some(s.folder.path.as_path()))
                {
                    section.files.push(item);
                }
            }
            (MAX_DEPTH, false) => {
                if let Some(sub) = sections
                    .last_mut()
                    .and_then(|s| s.subsections.last_mut())
                    .filter(|sub| item.path.parent() == Some(sub.folder.path.as_path()))
                {
                    sub.files.push(item);
                }
            }
            _ => {}
        }
    }

    sections
}

fn to_entry(root: &Path, entry: DirEntry) -> Option<Entry> {
    let path = entry.into_path();
    let Some(key) = paths::relative_key(root, &path) else {
        warn!(path = %path.display(), "entry resolves outside documentation root, skipping");
        return None;
    };
    let name = path.file_name()?.to_str()?.to_string();
    Some(Entry { name, path, key })
}

/// Returns `None` for folders with no markdown content at either level.
fn scan_section(section: SectionEntries) -> Option<DocSection> {
    let files = scan_files(section.files);

    let subsections: Vec<DocSubsection> = section
        .subsections
        .into_iter()
        .filter_map(|sub| {
            let files = scan_files(sub.files);
            (!files.is_empty()).then(|| DocSubsection {
                title: folder_title(&sub.folder.name),
                id: sub.folder.name,
                path: sub.folder.key,
                files,
            })
        })
        .collect();

    if files.is_empty() && subsections.is_empty() {
        return None;
    }

    let folder = section.folder;
    Some(DocSection {
        title: folder_title(&folder.name),
        id: folder.name,
        path: folder.key,
        files,
        subsections,
    })
}

fn scan_files(entries: Vec<Entry>) -> Vec<DocFile> {
    entries.into_iter().filter_map(scan_file).collect()
}

/// First `LEADING_LINES` lines of the file; the remainder is never read.
fn read_leading_lines(path: &Path) -> std::io::Result<String> {
    let reader = BufReader::new(File::open(path)?);
    let lines = reader
        .lines()
        .take(LEADING_LINES)
        .collect::<std::io::Result<Vec<String>>>()?;
    Ok(lines.join("\n"))
}

fn scan_file(entry: Entry) -> Option<DocFile> {
    let size = std::fs::metadata(&entry.path)
        .inspect_err(|e| warn!(path = %entry.path.display(), error = %e, "failed to stat file, skipping"))
        .ok()?
        .len();
    let leading = read_leading_lines(&entry.path)
        .inspect_err(|e| warn!(path = %entry.path.display(), error = %e, "failed to read file, skipping"))
        .ok()?;

    let name = entry
        .path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(entry.name.as_str())
        .to_string();
    let meta = extract_metadata(&leading, &name);

    Some(DocFile {
        name,
        title: meta.title,
        description: meta.description,
        path: entry.key,
        size,
    })
}
