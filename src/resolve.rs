use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid percent-encoding in request path")]
    BadEncoding,
    #[error("request path escapes the served root")]
    Traversal,
    #[error("no such file or directory")]
    NotFound,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub enum Resolved {
    File(PathBuf),
    Dir(PathBuf),
    /// Directory requested without a trailing slash; the client should
    /// be redirected to the slash-terminated path.
    DirNoSlash,
}

/// Map a request path onto the filesystem under `root`.
///
/// The decoded path is rebuilt segment by segment: empty and `.`
/// segments are dropped, and any `..` segment fails the whole lookup,
/// so the result can never name anything above `root`.
pub async fn resolve(root: &Path, uri_path: &str) -> Result<Resolved, ResolveError> {
    let decoded = percent_decode_str(uri_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadEncoding)?;

    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(ResolveError::Traversal),
            _ => path.push(segment),
        }
    }

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ResolveError::NotFound),
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        if decoded.ends_with('/') {
            Ok(Resolved::Dir(path))
        } else {
            Ok(Resolved::DirNoSlash)
        }
    } else if decoded.ends_with('/') {
        // "file.txt/" names a directory that doesn't exist
        Err(ResolveError::NotFound)
    } else {
        Ok(Resolved::File(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn scratch_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.txt"), b"alpha").await.unwrap();
        tokio::fs::create_dir(dir.path().join("sub")).await.unwrap();
        dir
    }

    #[tokio::test]
    async fn resolves_a_plain_file() {
        let root = scratch_root().await;
        match resolve(root.path(), "/a.txt").await.unwrap() {
            Resolved::File(path) => assert_eq!(path, root.path().join("a.txt")),
            _ => panic!("expected a file"),
        }
    }

    #[tokio::test]
    async fn resolves_percent_encoded_segments() {
        let root = scratch_root().await;
        tokio::fs::write(root.path().join("hello world.txt"), b"hi").await.unwrap();
        match resolve(root.path(), "/hello%20world.txt").await.unwrap() {
            Resolved::File(path) => assert_eq!(path, root.path().join("hello world.txt")),
            _ => panic!("expected a file"),
        }
    }

    #[tokio::test]
    async fn directory_with_and_without_slash() {
        let root = scratch_root().await;
        assert!(matches!(
            resolve(root.path(), "/sub/").await.unwrap(),
            Resolved::Dir(_)
        ));
        assert!(matches!(
            resolve(root.path(), "/sub").await.unwrap(),
            Resolved::DirNoSlash
        ));
    }

    #[tokio::test]
    async fn rejects_dotdot_segments() {
        let root = scratch_root().await;
        assert!(matches!(
            resolve(root.path(), "/../outside.txt").await,
            Err(ResolveError::Traversal)
        ));
        assert!(matches!(
            resolve(root.path(), "/%2e%2e/outside.txt").await,
            Err(ResolveError::Traversal)
        ));
        assert!(matches!(
            resolve(root.path(), "/sub/%2E%2E/%2E%2E/outside.txt").await,
            Err(ResolveError::Traversal)
        ));
    }

    #[tokio::test]
    async fn missing_paths_are_not_found() {
        let root = scratch_root().await;
        assert!(matches!(
            resolve(root.path(), "/missing.txt").await,
            Err(ResolveError::NotFound)
        ));
        // a file is not a directory
        assert!(matches!(
            resolve(root.path(), "/a.txt/").await,
            Err(ResolveError::NotFound)
        ));
    }

    #[tokio::test]
    async fn rejects_invalid_utf8() {
        let root = scratch_root().await;
        assert!(matches!(
            resolve(root.path(), "/%ff").await,
            Err(ResolveError::BadEncoding)
        ));
    }
}
