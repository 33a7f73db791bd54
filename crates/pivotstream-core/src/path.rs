//! POSIX-style path handling for archive-internal names.
//!
//! Archive entries live in a flat namespace rooted at the archive itself;
//! references between entries are relative URLs. These helpers never touch
//! the filesystem.

/// Reduce a path to its canonical segments.
///
/// `.` and empty segments are dropped. `..` removes the previous segment
/// when there is one and is discarded otherwise, so a path can never climb
/// above the archive root.
pub fn normalize_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}

/// Canonical form of `path`, segments joined with `/`.
pub fn normalize_path(path: &str) -> String {
    normalize_segments(path).join("/")
}

/// Resolve `href` relative to the directory `base_dir` and normalize.
pub fn join(base_dir: &str, href: &str) -> String {
    if base_dir.is_empty() {
        normalize_path(href)
    } else {
        normalize_path(&format!("{base_dir}/{href}"))
    }
}

/// Directory part of an archive path, empty for top-level entries.
pub fn parent_dir(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}

/// Drop a `#fragment` from a reference.
pub fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map(|(path, _)| path).unwrap_or(href)
}
