use crate::error::{AppError, Result};
use std::fs;
use std::path::Path;

/// Pure validation checks for the interactive prompts.
///
/// Identifier syntax is delegated to [`crate::provider::VideoIdentifier`];
/// the checks here cover the numeric selection, the save directory and the
/// generated file name.

/// Characters rejected in file names, matching the Windows superset so the
/// output stays portable.
pub const RESERVED_FILE_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Validates a 1-based ordinal against the number of offered streams.
///
/// Callers map non-numeric input to `0` before calling, so it always lands
/// in the failure branch instead of panicking.
///
/// # Errors
/// Returns `AppError::OutOfRange` unless `1 <= chosen <= count`.
pub fn validate_selection(chosen: usize, count: usize) -> Result<usize> {
    if (1..=count).contains(&chosen) {
        Ok(chosen)
    } else {
        Err(AppError::OutOfRange { chosen, count })
    }
}

/// Validates a save directory supplied by the user.
///
/// A blank path is valid and means "current directory"; nothing is touched
/// on disk. A missing path is created, and the OS diagnostic is surfaced
/// when creation fails. An existing path that is not a directory is
/// rejected: the later join would otherwise produce an unwritable
/// destination.
///
/// # Errors
/// Returns `AppError::Directory` carrying the underlying diagnostic.
pub fn validate_directory(path: &str) -> Result<()> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(());
    }

    let dir = Path::new(path);
    if dir.exists() {
        if dir.is_dir() {
            return Ok(());
        }
        return Err(AppError::Directory(format!(
            "'{path}' already exists and is not a directory"
        )));
    }

    fs::create_dir_all(dir).map_err(|e| AppError::Directory(e.to_string()))
}

/// True iff `name` contains no reserved or control characters.
pub fn is_file_name_safe(name: &str) -> bool {
    !name
        .chars()
        .any(|c| RESERVED_FILE_NAME_CHARS.contains(&c) || c.is_control())
}

/// Lowercase, alphanumeric-and-hyphen transformation of arbitrary text.
/// Runs of other characters collapse into a single hyphen; the result never
/// starts or ends with one.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Builds the download file name from the video title and container name,
/// substituting the slug when the title is not filesystem-safe.
pub fn build_file_name(title: &str, container: &str) -> String {
    if is_file_name_safe(title) {
        format!("{title}.{container}")
    } else {
        format!("{}.{container}", slugify(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn selection_inside_range_is_returned_unchanged() {
        for chosen in 1..=3 {
            assert_eq!(validate_selection(chosen, 3).unwrap(), chosen);
        }
    }

    #[test]
    fn selection_outside_range_fails() {
        assert!(validate_selection(0, 3).is_err()); // non-numeric input maps here
        assert!(validate_selection(4, 3).is_err());
        assert!(validate_selection(1, 0).is_err());
    }

    #[test]
    fn blank_directory_is_valid_without_touching_disk() {
        validate_directory("").unwrap();
        validate_directory("   ").unwrap();
    }

    #[test]
    fn existing_directory_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        validate_directory(dir.path().to_str().unwrap()).unwrap();
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        validate_directory(nested.to_str().unwrap()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn existing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        File::create(&file).unwrap();
        let err = validate_directory(file.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn reserved_characters_are_unsafe() {
        assert!(!is_file_name_safe("a:b"));
        assert!(!is_file_name_safe("a/b"));
        assert!(!is_file_name_safe("a\\b"));
        assert!(!is_file_name_safe("what?"));
        assert!(is_file_name_safe("a b-c_1"));
    }

    #[test]
    fn slugify_collapses_and_lowercases() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("a/b"), "a-b");
        assert_eq!(slugify("  --  "), "");
        assert_eq!(slugify("Already-Fine-123"), "already-fine-123");
    }

    #[test]
    fn unsafe_title_falls_back_to_slug_keeping_extension() {
        assert_eq!(build_file_name("a/b", "mp4"), "a-b.mp4");
        assert_eq!(build_file_name("Plain Title", "webm"), "Plain Title.webm");
    }
}
