//! Filesystem path resolution and config file discovery

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// Canonicalize `path`, following symlinks
///
/// Fails if the target does not exist or cannot be reached. Callers decide
/// what an empty path means before getting here.
pub fn resolve_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    path.canonicalize()
        .map_err(|source| ConfigError::PathUnresolvable {
            path: path.to_path_buf(),
            source,
        })
}

/// Return the first candidate that resolves, in priority order
///
/// Later candidates are not looked at once one resolves. If none do, the
/// error lists the reason for each of them.
pub fn find_config_file<I, P>(candidates: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut errs = Vec::new();

    for file in candidates {
        let file = file.as_ref();
        match resolve_path(file) {
            Ok(resolved) => {
                tracing::debug!("Using config file {:?}", resolved);
                return Ok(resolved);
            }
            Err(err) => {
                let reason = match err {
                    ConfigError::PathUnresolvable { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                tracing::debug!("Config file {:?} unresolvable: {}", file, reason);
                errs.push(format!("config file {:?} unresolvable: {}", file, reason));
            }
        }
    }

    Err(ConfigError::NoConfigFile(errs.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_existing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vmlinuz");
        fs::write(&file, b"").unwrap();

        let resolved = resolve_path(&file).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, file.canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_follows_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("qemu-system-x86_64");
        let link = dir.path().join("qemu");
        fs::write(&target, b"").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(resolve_path(&link).unwrap(), target.canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.img");

        match resolve_path(&missing) {
            Err(ConfigError::PathUnresolvable { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected PathUnresolvable, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();

        assert!(matches!(
            resolve_path(&link),
            Err(ConfigError::PathUnresolvable { .. })
        ));
    }

    #[test]
    fn test_find_prefers_first_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let sysconf = dir.path().join("etc.toml");
        let packaged = dir.path().join("share.toml");
        fs::write(&sysconf, b"").unwrap();
        fs::write(&packaged, b"").unwrap();

        let found = find_config_file([&sysconf, &packaged]).unwrap();
        assert_eq!(found, sysconf.canonicalize().unwrap());
    }

    #[test]
    fn test_find_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let sysconf = dir.path().join("etc.toml");
        let packaged = dir.path().join("share.toml");
        fs::write(&packaged, b"").unwrap();

        let found = find_config_file([&sysconf, &packaged]).unwrap();
        assert_eq!(found, packaged.canonicalize().unwrap());
    }

    #[test]
    fn test_find_aggregates_reasons() {
        let dir = tempfile::tempdir().unwrap();
        let sysconf = dir.path().join("etc.toml");
        let packaged = dir.path().join("share.toml");

        let err = find_config_file([&sysconf, &packaged]).unwrap_err();
        let ConfigError::NoConfigFile(msg) = &err else {
            panic!("expected NoConfigFile, got {:?}", err);
        };

        let parts: Vec<&str> = msg.split(", config file").collect();
        assert_eq!(parts.len(), 2);
        assert!(msg.contains(&format!("{:?}", sysconf)));
        assert!(msg.contains(&format!("{:?}", packaged)));
        assert!(msg.find("etc.toml").unwrap() < msg.find("share.toml").unwrap());
    }

    #[test]
    fn test_find_no_candidates() {
        let empty: [PathBuf; 0] = [];
        assert!(matches!(
            find_config_file(empty),
            Err(ConfigError::NoConfigFile(msg)) if msg.is_empty()
        ));
    }
}
