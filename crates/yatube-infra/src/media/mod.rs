//! Media storage for uploaded post images.

mod local;
mod memory;

pub use local::LocalMediaStorage;
pub use memory::InMemoryMediaStorage;

use yatube_core::ports::StorageError;

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Check one path segment: non-empty, no separators, no parent references.
fn check_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

/// `name.ext` -> `name_ab12cd3.ext`.
fn with_random_suffix(file_name: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string()[..7].to_string();
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{file_name}_{suffix}"),
    }
}

/// Candidate names for a file: the requested one, then suffixed variants.
fn candidate_names(file_name: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(file_name.to_string())
        .chain((1..MAX_NAME_ATTEMPTS).map(move |_| with_random_suffix(file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        assert!(check_segment("posts").is_ok());
        assert!(check_segment("small.gif").is_ok());
        assert!(check_segment("..").is_err());
        assert!(check_segment("a/b").is_err());
        assert!(check_segment("").is_err());
    }

    #[test]
    fn test_random_suffix_keeps_extension() {
        let name = with_random_suffix("small.gif");
        assert!(name.starts_with("small_"));
        assert!(name.ends_with(".gif"));
        assert_eq!(name.len(), "small_".len() + 7 + ".gif".len());
    }

    #[test]
    fn test_candidates_start_with_requested_name() {
        let names: Vec<String> = candidate_names("a.png").collect();
        assert_eq!(names[0], "a.png");
        assert_eq!(names.len(), MAX_NAME_ATTEMPTS);
    }
}
