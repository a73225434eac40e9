use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

const DOCUMENT_EXT: &str = "json";
const MAX_KEY_LEN: usize = 128;

/// Collapses `.`/`..` lexically and rejects anything that climbs above the base.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StorageError::PathTraversalAttempt {
                        message: path.display().to_string().into(),
                        context: Some("Path attempted to escape sandbox via '..'".into()),
                    });
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("Absolute paths are not allowed in sandbox".into()),
                });
            },
        }
    }

    Ok(out)
}

/// Joins `path` to `root` and verifies the result stays inside the sandbox.
pub(crate) fn resolve_path(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let path = path.as_ref();
    let joined = root.join(normalize_relative(path)?);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(StorageError::PathTraversalAttempt {
            message: canonical.display().to_string().into(),
            context: Some("Resolved path is outside the sandbox".into()),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => validate_ancestors(root, &joined),
        Err(e) => Err(StorageError::Io { source: e, context: None }),
    }
}

/// Document keys become file names: `[A-Za-z0-9_.-]`, no leading dot.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            message: key.to_owned().into(),
            context: Some("Keys use letters, digits, '_', '-', '.' and cannot start with '.'".into()),
        })
    }
}

pub(crate) fn document_path(
    root: &Path,
    namespace: Option<&str>,
    key: &str,
) -> Result<PathBuf, StorageError> {
    validate_key(key)?;
    let mut rel = PathBuf::new();
    if let Some(ns) = namespace {
        rel.push(ns);
    }
    rel.push(format!("{key}.{DOCUMENT_EXT}"));
    resolve_path(root, rel)
}

/// Key of a document file, if `path` names one.
pub(crate) fn key_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXT) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    validate_key(stem).ok().map(|()| stem.to_owned())
}

/// For paths that do not exist yet: the first existing ancestor must resolve inside `root`.
fn validate_ancestors(root: &Path, joined: &Path) -> Result<PathBuf, StorageError> {
    if !joined.starts_with(root) {
        return Err(StorageError::PathTraversalAttempt {
            message: joined.display().to_string().into(),
            context: Some("Path is outside sandbox boundaries".into()),
        });
    }

    let mut current = Some(joined);
    while let Some(path) = current {
        if path == root {
            return Ok(joined.to_path_buf());
        }
        if path.exists() {
            return match path.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(joined.to_path_buf()),
                Ok(canonical) => Err(StorageError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Existing parent is a symlink outside sandbox".into()),
                }),
                Err(e) => Err(StorageError::Io {
                    source: e,
                    context: Some("Failed to verify parent directory".into()),
                }),
            };
        }
        current = path.parent();
    }

    Err(StorageError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("No valid parent directory found within sandbox".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_file_name_safe() {
        assert!(validate_key("members").is_ok());
        assert!(validate_key("identifier-LE-01.v2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("..").is_err());
    }

    #[test]
    fn parent_segments_cannot_escape() {
        assert!(normalize_relative(Path::new("a/../b")).is_ok());
        assert!(matches!(
            normalize_relative(Path::new("../etc")),
            Err(StorageError::PathTraversalAttempt { .. })
        ));
    }

    #[test]
    fn key_of_only_accepts_documents() {
        assert_eq!(key_of(Path::new("/x/grid.members.json")).as_deref(), Some("grid.members"));
        assert_eq!(key_of(Path::new("/x/session.json.ctntmp.3")), None);
        assert_eq!(key_of(Path::new("/x/readme.txt")), None);
    }
}
