//! `# key: value` metadata comments at the top of a configuration file

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*([A-Za-z0-9_.-]+)\s*:\s*(.*?)\s*$").expect("valid metadata pattern")
});

/// Server version the file was written for
pub const SERVER_VERSION: &str = "aerospike-server-version";

/// Version of the tool that wrote the file
pub const TOOL_VERSION: &str = "asconfig-version";

/// Metadata entries keyed by name
pub type Metadata = BTreeMap<String, String>;

/// Collect metadata from the leading comment block
///
/// Only the first occurrence of a key counts. Comment lines that do not
/// look like `# key: value` are ignored; the block ends at the first line
/// that is neither blank nor a comment.
#[must_use]
#[inline]
pub fn parse(input: &str) -> Metadata {
    let mut metadata = Metadata::new();
    for line in input.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if !line.starts_with('#') {
            break;
        }
        if let Some(captures) = METADATA_LINE.captures(line) {
            metadata
                .entry(captures[1].to_owned())
                .or_insert_with(|| captures[2].to_owned());
        }
    }
    metadata
}

/// Render metadata as `# key: value` lines
#[must_use]
#[inline]
pub fn render(metadata: &Metadata) -> String {
    metadata
        .iter()
        .map(|(key, value)| format!("# {key}: {value}\n"))
        .collect()
}
