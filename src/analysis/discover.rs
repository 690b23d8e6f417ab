use crate::fs::FileSystem;
use crate::model::{ModulePath, Package, PathMatcher, SourceFile};
use crate::parser::{GoParser, is_go_source};
use ignore::{DirEntry, WalkBuilder};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything the walk found under the module root.
pub struct Discovery {
    /// Parsed files, sorted by path.
    pub files: Vec<SourceFile>,
    pub packages: Vec<Package>,
    /// Files that could not be read or parsed.
    pub skipped: usize,
}

/// Walk `root`, parse every non-test Go file's imports and group them into packages.
///
/// Unreadable or unparseable files are logged and skipped, as are walk errors.
pub fn discover_packages(
    root: &Path,
    module: &ModulePath,
    exclude: &PathMatcher,
    fs: &dyn FileSystem,
) -> Discovery {
    let paths = collect_go_files(root, exclude);
    debug!(count = paths.len(), "collected go source files");

    let parser = GoParser::new();
    let results: Vec<Option<SourceFile>> = paths
        .par_iter()
        .map(|path| {
            let source = match fs.read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    return None;
                }
            };
            match parser.parse_file(path, &source) {
                Ok(mut file) => {
                    file.package_dir = package_dir(root, path);
                    Some(file)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unparseable file");
                    None
                }
            }
        })
        .collect();

    let skipped = results.iter().filter(|r| r.is_none()).count();
    let mut files: Vec<SourceFile> = results.into_iter().flatten().collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let packages = group_packages(&files, module);

    Discovery {
        files,
        packages,
        skipped,
    }
}

fn collect_go_files(root: &Path, exclude: &PathMatcher) -> Vec<PathBuf> {
    let filter_root = root.to_path_buf();
    let filter_exclude = exclude.clone();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(move |entry| keep_entry(entry, &filter_root, &filter_exclude))
        .build();

    let mut paths = Vec::new();
    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_some_and(|t| t.is_file()) && is_go_source(path) {
                    paths.push(path.to_path_buf());
                }
            }
            Err(e) => warn!(error = %e, "skipping path during walk"),
        }
    }

    paths.sort();
    paths
}

/// Directories the go tool ignores, plus configured excludes.
fn keep_entry(entry: &DirEntry, root: &Path, exclude: &PathMatcher) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
    if is_dir {
        let name = entry.file_name().to_string_lossy();
        if name == "vendor" || name == "testdata" || name.starts_with('.') || name.starts_with('_')
        {
            return false;
        }
        if exclude.covers(&relative_slash_path(root, entry.path())) {
            return false;
        }
    }
    true
}

/// `/`-separated path of `path` relative to `root`, `.` for the root itself.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

fn package_dir(root: &Path, file: &Path) -> String {
    match file.parent() {
        Some(parent) => relative_slash_path(root, parent),
        None => ".".to_string(),
    }
}

fn group_packages(files: &[SourceFile], module: &ModulePath) -> Vec<Package> {
    let mut by_dir: BTreeMap<&str, Vec<&SourceFile>> = BTreeMap::new();
    for file in files {
        by_dir.entry(file.package_dir.as_str()).or_default().push(file);
    }

    by_dir
        .into_iter()
        .map(|(dir, dir_files)| {
            let imports: BTreeSet<String> = dir_files
                .iter()
                .flat_map(|f| f.imports.iter())
                .filter_map(|import| module.internal_package(&import.path))
                .filter(|target| target != dir)
                .collect();

            Package {
                path: dir.to_string(),
                name: package_name(&dir_files),
                files: dir_files.iter().map(|f| f.path.clone()).collect(),
                imports: imports.into_iter().collect(),
            }
        })
        .collect()
}

/// Most common package name in a directory; files are sorted so ties are stable.
fn package_name(files: &[&SourceFile]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for file in files {
        *counts.entry(file.package_name.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a_name, a), (b_name, b)| a.cmp(b).then_with(|| b_name.cmp(a_name)))
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}
