/// Format file size in human-readable format
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f = bytes as f64;
    let unit_index = (bytes_f.log10() / THRESHOLD.log10()).floor() as usize;
    let unit_index = unit_index.min(UNITS.len() - 1);

    let size = bytes_f / THRESHOLD.powi(unit_index as i32);

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Turn an article title into a filesystem-safe name
///
/// Keeps alphanumerics, hyphens and underscores, collapses everything else to
/// single underscores and caps the result at 60 characters.
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::new();

    for c in name.chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            sanitized.push(c);
        } else if !sanitized.ends_with('_') {
            sanitized.push('_');
        }
    }

    let sanitized: String = sanitized.trim_matches('_').chars().take(60).collect();
    if sanitized.is_empty() {
        "untitled".to_string()
    } else {
        sanitized
    }
}

/// Generate a unique filename with timestamp
pub fn generate_unique_filename(base_name: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let random_suffix = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();

    format!(
        "blogsmith_{}_{}_{}.{}",
        sanitize_filename(base_name),
        timestamp,
        random_suffix,
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1048576), "1.0 MB");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World!"), "Hello_World");
        assert_eq!(sanitize_filename("test/file?name"), "test_file_name");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
        assert_eq!(sanitize_filename("Rust: Fearless & Fast"), "Rust_Fearless_Fast");
        assert_eq!(sanitize_filename("???"), "untitled");
        assert_eq!(sanitize_filename(&"a".repeat(100)).len(), 60);
    }

    #[test]
    fn test_generate_unique_filename() {
        let name = generate_unique_filename("My Post", "mp3");
        assert!(name.starts_with("blogsmith_My_Post_"));
        assert!(name.ends_with(".mp3"));
        assert_ne!(name, generate_unique_filename("My Post", "mp3"));
    }
}
