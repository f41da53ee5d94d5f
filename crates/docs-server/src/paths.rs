/// Lexical path normalization and root containment checks.
///
/// Containment compares path components, never raw strings: `/data/docs-secret`
/// is not inside `/data/docs`.
use std::path::{Component, Path, PathBuf};

const MARKDOWN_EXTENSION: &str = "md";

/// Entry names that are never listed or served regardless of prefix.
pub const SYSTEM_ENTRIES: &[&str] = &["node_modules"];

/// Resolve `.`, `..` and redundant separators without touching the filesystem.
///
/// `..` never climbs above the filesystem root. On a relative path, leading
/// `..` components are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Join an untrusted relative path onto `root` and return the normalized
/// candidate only if it stays inside the normalized root.
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let candidate = normalize(&root.join(relative));
    let root = normalize(root);
    candidate.starts_with(&root).then_some(candidate)
}

/// `/`-separated form of `path` relative to `root`, used as a lookup key.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<_>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

/// Dot- and underscore-prefixed names, plus system folders.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_') || SYSTEM_ENTRIES.contains(&name)
}

/// True when any component of `path` below `root` is hidden.
pub fn has_hidden_component(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .map(|relative| {
            relative.components().any(|component| match component {
                Component::Normal(part) => part.to_str().map_or(true, is_hidden),
                _ => false,
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_dots_and_separators() {
        assert_eq!(
            normalize(Path::new("/data/docs/./guides//../intro.md")),
            PathBuf::from("/data/docs/intro.md")
        );
        assert_eq!(normalize(Path::new("/data/../../..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn traversal_out_of_root_is_rejected() {
        let root = Path::new("/data/docs");
        assert_eq!(resolve_within(root, "../../etc/passwd"), None);
        assert_eq!(resolve_within(root, "guides/../../secret.md"), None);
        assert_eq!(resolve_within(root, "/etc/passwd"), None);
    }

    #[test]
    fn sibling_with_shared_name_prefix_is_rejected() {
        let root = Path::new("/data/docs");
        assert_eq!(resolve_within(root, "../docsSecret/x.md"), None);
        assert_eq!(resolve_within(root, "../docs-old/x.md"), None);
    }

    #[test]
    fn paths_inside_root_resolve() {
        let root = Path::new("/data/docs/");
        assert_eq!(
            resolve_within(root, "guides/./setup.md"),
            Some(PathBuf::from("/data/docs/guides/setup.md"))
        );
        assert_eq!(
            resolve_within(root, "guides/../faq.md"),
            Some(PathBuf::from("/data/docs/faq.md"))
        );
    }

    #[test]
    fn markdown_extension_is_case_insensitive() {
        assert!(is_markdown(Path::new("guides/setup.md")));
        assert!(is_markdown(Path::new("guides/SETUP.MD")));
        assert!(!is_markdown(Path::new("guides/setup.markdown.txt")));
        assert!(!is_markdown(Path::new("guides/md")));
    }

    #[test]
    fn relative_key_uses_forward_slashes() {
        let root = Path::new("/data/docs");
        assert_eq!(
            relative_key(root, &root.join("guides").join("setup.md")),
            Some("guides/setup.md".to_string())
        );
        assert_eq!(relative_key(root, root), None);
        assert_eq!(relative_key(root, Path::new("/elsewhere/a.md")), None);
    }

    #[test]
    fn hidden_names_and_components() {
        assert!(is_hidden(".draft.md"));
        assert!(is_hidden("_partials"));
        assert!(is_hidden("node_modules"));
        assert!(!is_hidden("guides"));

        let root = Path::new("/data/docs");
        assert!(has_hidden_component(root, Path::new("/data/docs/_partials/x.md")));
        assert!(has_hidden_component(root, Path::new("/data/docs/guides/.draft.md")));
        assert!(has_hidden_component(
            root,
            Path::new("/data/docs/node_modules/pkg/readme.md")
        ));
        assert!(!has_hidden_component(root, Path::new("/data/docs/guides/setup.md")));
        assert!(!has_hidden_component(Path::new("/data/.docs"), Path::new("/data/.docs/a.md")));
    }
}
