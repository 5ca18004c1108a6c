//! Small helpers shared by the binary and the library: message prefixes,
//! comma-separated configuration values, path display, and logging setup.

use owo_colors::OwoColorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if colors_enabled() {
        paint(label)
    } else {
        label.to_string()
    }
}

/// `error:` prefix for fatal user-facing messages.
pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

/// `note:` prefix for advisory messages.
pub fn note_prefix() -> String {
    prefix("note:", |s| s.yellow().bold().to_string())
}

/// `info:` prefix for informational messages.
pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// Split comma-separated configuration text into trimmed, non-empty tokens.
///
/// `" compile, runtime,,test "` yields `["compile", "runtime", "test"]`.
pub fn split_comma_separated(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render `path` relative to `root` when possible, otherwise as given.
pub fn display_path(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|p| !p.as_os_str().is_empty() && !p.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Install the stderr tracing subscriber used by the binary.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `warn`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "pedant=debug" } else { "pedant=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_split_comma_separated_trims_and_skips_empty() {
        assert_eq!(
            split_comma_separated(" compile, runtime,,test "),
            vec!["compile", "runtime", "test"]
        );
        assert!(split_comma_separated("  ").is_empty());
    }

    #[test]
    fn test_display_path_relative_to_root() {
        let root = PathBuf::from("/repo");
        assert_eq!(
            display_path(&root.join("build/app.json"), &root),
            "build/app.json"
        );
        assert_eq!(display_path(Path::new("/elsewhere/x.json"), &root), "/elsewhere/x.json");
    }
}
