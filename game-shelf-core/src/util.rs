const KIB: f64 = 1024.0;

/// Human-readable transfer size: "812 B", "4.0 KB", "1.5 MB", "2.25 GB".
///
/// Gigabytes keep two decimals.
pub fn format_size(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= KIB * KIB * KIB {
        format!("{:.2} GB", b / (KIB * KIB * KIB))
    } else if b >= KIB * KIB {
        format!("{:.1} MB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.1} KB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Maximum length of a name produced by [`safe_filename`].
pub const MAX_FILENAME_LEN: usize = 100;

/// Make a game name usable as a file name on every desktop OS.
///
/// Characters reserved on Windows (`<>:"/\|?*`) become `_`, surrounding
/// whitespace is trimmed, and the result is capped at [`MAX_FILENAME_LEN`]
/// characters.
pub fn safe_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    replaced.trim().chars().take(MAX_FILENAME_LEN).collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(4096), "4.0 KB");
        assert_eq!(format_size(1536 * 1024), "1.5 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024 / 2), "2.50 GB");
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Halo: Reach"), "Halo_ Reach");
        assert_eq!(safe_filename("a/b\\c|d?e*f"), "a_b_c_d_e_f");
        assert_eq!(safe_filename("  padded  "), "padded");
        assert_eq!(safe_filename(&"x".repeat(250)).len(), MAX_FILENAME_LEN);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Dark   Souls \t III "), "Dark Souls III");
        assert_eq!(collapse_whitespace(""), "");
    }
}
