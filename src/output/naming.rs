//! Filesystem-safe names for mirrored batches and chapters

use std::collections::HashSet;

/// Upper bound on a folder name, counted in characters
pub const MAX_NAME_CHARS: usize = 100;

/// Characters rejected by at least one common filesystem
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Converts a page title into a filesystem-safe name
///
/// Removes `< > : " / \ | ? *`, collapses whitespace runs to one space,
/// trims, and truncates to [`MAX_NAME_CHARS`] characters. An empty result
/// is possible and left to the caller.
///
/// # Examples
///
/// ```
/// use course_mirror::sanitize;
///
/// assert_eq!(sanitize("  Ch 1:   Motion? "), "Ch 1 Motion");
/// ```
pub fn sanitize(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    // Truncation can expose a trailing space
    let truncated: String = collapsed.chars().take(MAX_NAME_CHARS).collect();
    truncated.trim_end().to_string()
}

/// Hands out unique folder names within one parent directory
///
/// Collisions are detected case-insensitively and resolved with a ` (n)`
/// suffix. Names that sanitize to nothing (or only dots) get a positional
/// placeholder such as `Chapter 4`.
#[derive(Debug)]
pub struct FolderAllocator {
    placeholder: &'static str,
    taken: HashSet<String>,
}

impl FolderAllocator {
    /// Creates an allocator whose placeholder names start with `placeholder`
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            placeholder,
            taken: HashSet::new(),
        }
    }

    /// Marks a sibling file name as unavailable
    pub fn reserve(mut self, name: &str) -> Self {
        self.taken.insert(name.to_lowercase());
        self
    }

    /// Allocates the folder name for the item at 1-based `position`
    pub fn allocate(&mut self, raw_name: &str, position: usize) -> String {
        let mut base = sanitize(raw_name);
        if base.chars().all(|c| c == '.') {
            base = format!("{} {}", self.placeholder, position);
        }

        if self.claim(&base) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!(" ({})", n);
            let room = MAX_NAME_CHARS - suffix.chars().count();
            let stem: String = base.chars().take(room).collect();
            let candidate = format!("{}{}", stem.trim_end(), suffix);

            if self.claim(&candidate) {
                tracing::debug!("Folder name '{}' taken, using '{}'", base, candidate);
                return candidate;
            }
            n += 1;
        }
    }

    fn claim(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<String> {
        vec![
            "Physics 101".to_string(),
            "Ch 1: Motion".to_string(),
            "  leading and trailing  ".to_string(),
            "a<b>c:d\"e/f\\g|h?i*j".to_string(),
            "tabs\tand\nnewlines\r\n  mixed".to_string(),
            "x".repeat(250),
            format!("{} tail", "y".repeat(99)),
            "ü".repeat(120),
            "???".to_string(),
            String::new(),
            "   ".to_string(),
            "Näive  Ünïcode\u{00a0}\u{2003}spaces".to_string(),
        ]
    }

    #[test]
    fn test_removes_illegal_characters() {
        assert_eq!(sanitize("a<b>c:d\"e/f\\g|h?i*j"), "abcdefghij");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize("Ch  1 \t Motion\n"), "Ch 1 Motion");
    }

    #[test]
    fn test_trims() {
        assert_eq!(sanitize("   Physics 101  "), "Physics 101");
    }

    #[test]
    fn test_truncates_in_characters() {
        let name = sanitize(&"ü".repeat(120));
        assert_eq!(name.chars().count(), MAX_NAME_CHARS);
        assert!(name.len() > MAX_NAME_CHARS);
    }

    #[test]
    fn test_truncation_does_not_leave_trailing_space() {
        let raw = format!("{} tail", "y".repeat(99));
        let name = sanitize(&raw);
        assert_eq!(name, "y".repeat(99));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("???"), "");
        assert_eq!(sanitize(" \t "), "");
    }

    #[test]
    fn test_invariants_hold_for_samples() {
        for raw in samples() {
            let name = sanitize(&raw);
            assert!(
                !name.chars().any(|c| ILLEGAL_CHARS.contains(&c)),
                "illegal char in {:?}",
                name
            );
            let chars: Vec<char> = name.chars().collect();
            assert!(
                !chars
                    .windows(2)
                    .any(|w| w[0].is_whitespace() && w[1].is_whitespace()),
                "whitespace run in {:?}",
                name
            );
            assert_eq!(name, name.trim());
            assert!(name.chars().count() <= MAX_NAME_CHARS);
        }
    }

    #[test]
    fn test_idempotent() {
        for raw in samples() {
            let once = sanitize(&raw);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_allocator_unique_names() {
        let mut alloc = FolderAllocator::new("Chapter");
        assert_eq!(alloc.allocate("Ch 1: Motion", 1), "Ch 1 Motion");
        assert_eq!(alloc.allocate("Ch 2: Force", 2), "Ch 2 Force");
    }

    #[test]
    fn test_allocator_disambiguates_collisions() {
        let mut alloc = FolderAllocator::new("Chapter");
        assert_eq!(alloc.allocate("Ch 1: Motion", 1), "Ch 1 Motion");
        assert_eq!(alloc.allocate("Ch 1 Motion", 2), "Ch 1 Motion (2)");
        assert_eq!(alloc.allocate("Ch 1 / Motion", 3), "Ch 1 Motion (3)");
    }

    #[test]
    fn test_allocator_is_case_insensitive() {
        let mut alloc = FolderAllocator::new("Batch");
        assert_eq!(alloc.allocate("Physics", 1), "Physics");
        assert_eq!(alloc.allocate("PHYSICS", 2), "PHYSICS (2)");
    }

    #[test]
    fn test_allocator_placeholder_for_empty_names() {
        let mut alloc = FolderAllocator::new("Chapter");
        assert_eq!(alloc.allocate("???", 3), "Chapter 3");
        assert_eq!(alloc.allocate("..", 4), "Chapter 4");
        assert_eq!(alloc.allocate("", 5), "Chapter 5");
    }

    #[test]
    fn test_allocator_reserved_names() {
        let mut alloc = FolderAllocator::new("Batch").reserve("index.html");
        assert_eq!(alloc.allocate("index.html", 1), "index.html (2)");
    }

    #[test]
    fn test_allocator_suffix_respects_length_bound() {
        let mut alloc = FolderAllocator::new("Chapter");
        let long = "z".repeat(150);
        let first = alloc.allocate(&long, 1);
        let second = alloc.allocate(&long, 2);

        assert_eq!(first.chars().count(), MAX_NAME_CHARS);
        assert_eq!(second.chars().count(), MAX_NAME_CHARS);
        assert!(second.ends_with(" (2)"));
        assert_ne!(first, second);
        assert_eq!(sanitize(&second), second);
    }
}
