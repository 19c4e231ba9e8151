//! Next-page cursor storage
//!
//! Next-page URLs are long and carry the access token, so they are stored on
//! disk under the MD5 hash of the URL and the user only sees the first 8
//! characters of that hash.

use std::fs;
use std::path::Path;

/// Length of the hash prefix shown to users.
pub const HASH_PREFIX_LEN: usize = 8;

#[derive(thiserror::Error, Debug)]
pub enum PaginationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Next-page cursor not found: {0}")]
    CursorNotFound(String),

    #[error("Invalid cursor hash: {0}")]
    InvalidHash(String),
}

fn hash_cursor(next_url: &str) -> String {
    format!("{:x}", md5::compute(next_url.as_bytes()))
}

/// Whether `input` has the shape of a cursor hash prefix.
pub fn is_cursor_hash(input: &str) -> bool {
    input.len() == HASH_PREFIX_LEN && input.chars().all(|c| c.is_ascii_hexdigit())
}

/// Store `next_url` and return its hash prefix.
pub fn save_cursor(cursor_dir: &Path, next_url: &str) -> Result<String, PaginationError> {
    fs::create_dir_all(cursor_dir)?;

    let full_hash = hash_cursor(next_url);
    fs::write(cursor_dir.join(&full_hash), next_url)?;

    Ok(full_hash[..HASH_PREFIX_LEN].to_string())
}

/// Load the next-page URL stored under `hash_prefix`.
pub fn load_cursor(cursor_dir: &Path, hash_prefix: &str) -> Result<String, PaginationError> {
    if !is_cursor_hash(hash_prefix) {
        return Err(PaginationError::InvalidHash(format!(
            "expected {HASH_PREFIX_LEN} hexadecimal characters, got '{hash_prefix}'"
        )));
    }

    if !cursor_dir.exists() {
        return Err(PaginationError::CursorNotFound(hash_prefix.to_string()));
    }

    for entry in fs::read_dir(cursor_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.len() == 32 && name.starts_with(hash_prefix));
        if matches {
            return Ok(fs::read_to_string(&path)?);
        }
    }

    Err(PaginationError::CursorNotFound(hash_prefix.to_string()))
}

/// Turn user input into a next-page URL.
///
/// Hash prefixes are looked up in `cursor_dir` and must have been saved
/// there; anything else is taken as a literal URL.
pub fn resolve_cursor(cursor_dir: &Path, url_or_hash: &str) -> Result<String, PaginationError> {
    if is_cursor_hash(url_or_hash) {
        load_cursor(cursor_dir, url_or_hash)
    } else {
        Ok(url_or_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NEXT_URL: &str = "https://api.instagram.com/v1/users/self/media/recent?access_token=tok&max_id=1761803436_25025320";

    #[test]
    fn test_save_and_load_cursor() {
        let temp_dir = TempDir::new().unwrap();

        let hash = save_cursor(temp_dir.path(), NEXT_URL).unwrap();

        assert_eq!(hash.len(), HASH_PREFIX_LEN);
        assert!(is_cursor_hash(&hash));
        assert_eq!(load_cursor(temp_dir.path(), &hash).unwrap(), NEXT_URL);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let hash = save_cursor(&nested, NEXT_URL).unwrap();
        assert_eq!(load_cursor(&nested, &hash).unwrap(), NEXT_URL);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_cursor(NEXT_URL), hash_cursor(NEXT_URL));
        assert_ne!(hash_cursor(NEXT_URL), hash_cursor("https://other"));
    }

    #[test]
    fn test_load_unknown_cursor() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_cursor(temp_dir.path(), "12345678");
        assert!(matches!(result, Err(PaginationError::CursorNotFound(_))));

        let result = load_cursor(&temp_dir.path().join("missing"), "12345678");
        assert!(matches!(result, Err(PaginationError::CursorNotFound(_))));
    }

    #[test]
    fn test_load_rejects_malformed_hash() {
        let temp_dir = TempDir::new().unwrap();

        for hash in ["1234567", "123456789", "zzzzzzzz"] {
            let result = load_cursor(temp_dir.path(), hash);
            assert!(matches!(result, Err(PaginationError::InvalidHash(_))), "{hash}");
        }
    }

    #[test]
    fn test_multiple_cursors() {
        let temp_dir = TempDir::new().unwrap();

        let first = save_cursor(temp_dir.path(), "https://api/page2").unwrap();
        let second = save_cursor(temp_dir.path(), "https://api/page3").unwrap();

        assert_ne!(first, second);
        assert_eq!(load_cursor(temp_dir.path(), &first).unwrap(), "https://api/page2");
        assert_eq!(load_cursor(temp_dir.path(), &second).unwrap(), "https://api/page3");
    }

    #[test]
    fn test_resolve_cursor() {
        let temp_dir = TempDir::new().unwrap();
        let hash = save_cursor(temp_dir.path(), NEXT_URL).unwrap();

        assert_eq!(resolve_cursor(temp_dir.path(), &hash).unwrap(), NEXT_URL);
        assert_eq!(
            resolve_cursor(temp_dir.path(), "https://api/page9").unwrap(),
            "https://api/page9"
        );
    }

    #[test]
    fn test_resolve_unknown_hash_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        save_cursor(temp_dir.path(), NEXT_URL).unwrap();

        let result = resolve_cursor(temp_dir.path(), "abcdef12");
        assert!(matches!(result, Err(PaginationError::CursorNotFound(ref hash)) if hash == "abcdef12"));
    }
}
