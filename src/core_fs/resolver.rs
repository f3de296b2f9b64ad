use crate::core_error::FtpError;
use log::warn;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Maps client-supplied paths onto the filesystem while keeping every result
/// inside the account root.
///
/// `root` must be absolute and canonical; `working_dir` must be inside `root`.
pub struct PathResolver<'a> {
    root: &'a Path,
    working_dir: &'a Path,
}

impl<'a> PathResolver<'a> {
    pub fn new(root: &'a Path, working_dir: &'a Path) -> Self {
        Self { root, working_dir }
    }

    /// Resolves `client_path` to an absolute path inside the root.
    ///
    /// Paths starting with a separator are anchored at the root, all others at
    /// the working directory. `.` and `..` are collapsed textually, then the
    /// result must have the root as a component-wise prefix. Finally the deepest
    /// existing ancestor is canonicalized and checked again, so a symlink inside
    /// the root cannot lead outside of it.
    pub async fn resolve(&self, client_path: &str) -> Result<PathBuf, FtpError> {
        let anchor = if client_path.starts_with(['/', '\\']) {
            self.root
        } else {
            self.working_dir
        };

        let resolved = normalize(anchor, client_path);
        self.confine(&resolved, client_path).await?;
        Ok(resolved)
    }

    /// Parent of the working directory, refused once it would leave the root.
    pub fn parent(&self) -> Result<PathBuf, FtpError> {
        match self.working_dir.parent() {
            Some(parent) if is_contained(self.root, parent) => Ok(parent.to_path_buf()),
            _ => Err(FtpError::FileUnavailable(String::from(".."))),
        }
    }

    /// Renders an absolute path relative to the root, `/` for the root itself.
    pub fn display_path(&self, path: &Path) -> String {
        display_path(self.root, path)
    }

    async fn confine(&self, resolved: &Path, client_path: &str) -> Result<(), FtpError> {
        if !is_contained(self.root, resolved) {
            warn!("Rejected path outside account root: {:?}", client_path);
            return Err(FtpError::AccessDenied(client_path.to_string()));
        }

        if !resolves_inside(self.root, resolved).await {
            warn!("Rejected path escaping account root through a link: {:?}", client_path);
            return Err(FtpError::AccessDenied(client_path.to_string()));
        }

        Ok(())
    }
}

/// Applies the client path segments to `anchor`. Both `/` and `\` separate
/// segments; `..` never climbs above the filesystem root.
pub fn normalize(anchor: &Path, client_path: &str) -> PathBuf {
    let mut resolved = anchor.to_path_buf();

    for segment in client_path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            name => {
                // A segment such as `C:` would replace the whole path on Windows.
                if Path::new(name)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
                {
                    resolved.push(name);
                } else {
                    resolved.push(name.replace(':', "_"));
                }
            }
        }
    }

    resolved
}

/// Component-wise prefix test; `/home2` is not inside `/home`.
pub fn is_contained(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}

/// Follows links on the deepest existing ancestor of `path` and checks the
/// real location is still inside `root`. Dangling links are refused.
async fn resolves_inside(root: &Path, path: &Path) -> bool {
    for ancestor in path.ancestors() {
        let metadata = match fs::symlink_metadata(ancestor).await {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };

        return match fs::canonicalize(ancestor).await {
            Ok(real) => is_contained(root, &real),
            Err(_) if metadata.file_type().is_symlink() => false,
            Err(_) => is_contained(root, ancestor),
        };
    }
    false
}

pub fn display_path(root: &Path, path: &Path) -> String {
    let relative = match path.strip_prefix(root) {
        Ok(relative) => relative,
        Err(_) => return String::from("/"),
    };

    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("alicehome");
        fs::create_dir_all(root.join("docs/nested")).unwrap();
        fs::create_dir_all(temp.path().join("alicehome2")).unwrap();
        fs::write(root.join("readme.txt"), b"0123456789").unwrap();
        let root = root.canonicalize().unwrap();
        (temp, root)
    }

    #[tokio::test]
    async fn test_relative_paths_anchor_at_working_dir() {
        let (_temp, root) = fixture();
        let cwd = root.join("docs");
        let resolver = PathResolver::new(&root, &cwd);

        assert_eq!(resolver.resolve("nested").await.unwrap(), root.join("docs/nested"));
        assert_eq!(resolver.resolve("./nested/.").await.unwrap(), root.join("docs/nested"));
        assert_eq!(resolver.resolve("..").await.unwrap(), root);
    }

    #[tokio::test]
    async fn test_absolute_paths_anchor_at_root() {
        let (_temp, root) = fixture();
        let cwd = root.join("docs/nested");
        let resolver = PathResolver::new(&root, &cwd);

        assert_eq!(resolver.resolve("/").await.unwrap(), root);
        assert_eq!(resolver.resolve("/readme.txt").await.unwrap(), root.join("readme.txt"));
        assert_eq!(resolver.resolve("\\docs").await.unwrap(), root.join("docs"));
    }

    #[tokio::test]
    async fn test_traversal_never_leaves_root() {
        let (_temp, root) = fixture();
        let cwd = root.join("docs");
        let resolver = PathResolver::new(&root, &cwd);

        for input in [
            "../..",
            "../../etc/passwd",
            "/../../etc",
            "..\\..\\..",
            "docs/../../..",
            "nested/../../../alicehome2",
            "/./../alicehome2",
            "..//..//",
        ] {
            match resolver.resolve(input).await {
                Ok(path) => assert!(path.starts_with(&root), "{} resolved to {:?}", input, path),
                Err(e) => assert!(matches!(e, FtpError::AccessDenied(_)), "{}: {:?}", input, e),
            }
        }
    }

    #[tokio::test]
    async fn test_sibling_with_common_prefix_is_denied() {
        let (_temp, root) = fixture();
        let resolver = PathResolver::new(&root, &root);
        assert!(matches!(
            resolver.resolve("../alicehome2").await,
            Err(FtpError::AccessDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_nonexistent_targets_inside_root_resolve() {
        let (_temp, root) = fixture();
        let resolver = PathResolver::new(&root, &root);
        assert_eq!(
            resolver.resolve("new/deep/dir").await.unwrap(),
            root.join("new/deep/dir")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_denied() {
        let (temp, root) = fixture();
        std::os::unix::fs::symlink(temp.path().join("alicehome2"), root.join("escape")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing"), root.join("dangling")).unwrap();
        let resolver = PathResolver::new(&root, &root);

        assert!(matches!(resolver.resolve("escape").await, Err(FtpError::AccessDenied(_))));
        assert!(matches!(
            resolver.resolve("escape/file.txt").await,
            Err(FtpError::AccessDenied(_))
        ));
        assert!(matches!(resolver.resolve("dangling").await, Err(FtpError::AccessDenied(_))));
    }

    #[test]
    fn test_parent_stops_at_root() {
        let (_temp, root) = fixture();
        let cwd = root.join("docs");
        assert_eq!(PathResolver::new(&root, &cwd).parent().unwrap(), root);
        assert!(PathResolver::new(&root, &root).parent().is_err());
    }

    #[test]
    fn test_display_path() {
        let root = PathBuf::from("/srv/ftp/alice");
        assert_eq!(display_path(&root, &root), "/");
        assert_eq!(display_path(&root, &root.join("docs/nested")), "/docs/nested");
    }
}
