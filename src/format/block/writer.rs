//! Writer for the block format (`aerospike.conf`)

use crate::model::{NAME_KEY, Scalar, Section, TYPE_KEY, Value};
use crate::normalize::keys;
use core::fmt::Write as _;

const INDENT: &str = "  ";

/// Renders documents in the block format
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockWriter;

impl BlockWriter {
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Render a document; top-level blocks are separated by a blank line
    #[must_use]
    #[inline]
    pub fn write(&self, root: &Section) -> String {
        let mut out = String::new();
        for (key, value) in root.iter() {
            let is_block = matches!(value, Value::Section(_) | Value::Sections(_));
            if is_block && !out.is_empty() {
                out.push('\n');
            }
            if key == keys::LOGGING {
                if let Value::Sections(sinks) = value {
                    write_logging(&mut out, sinks);
                    continue;
                }
            }
            write_entry(&mut out, 0, key, value);
        }
        out
    }
}

/// Render a document in the block format
#[must_use]
#[inline]
pub fn write(root: &Section) -> String {
    BlockWriter::new().write(root)
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_line(out: &mut String, depth: usize, key: &str, scalar: &Scalar) {
    indent(out, depth);
    let _ = writeln!(out, "{key} {scalar}");
}

fn open(out: &mut String, depth: usize, key: &str, identifier: Option<&Scalar>) {
    indent(out, depth);
    match identifier {
        Some(identifier) => {
            let _ = writeln!(out, "{key} {identifier} {{");
        }
        None => {
            let _ = writeln!(out, "{key} {{");
        }
    }
}

fn close(out: &mut String, depth: usize) {
    indent(out, depth);
    out.push_str("}\n");
}

fn write_body(out: &mut String, depth: usize, section: &Section, skip: Option<&str>) {
    for (key, value) in section.iter() {
        if Some(key.as_str()) == skip {
            continue;
        }
        write_entry(out, depth, key, value);
    }
}

fn write_entry(out: &mut String, depth: usize, key: &str, value: &Value) {
    let block_key = keys::singular_of(key).unwrap_or(key);
    match value {
        Value::Scalar(scalar) => write_line(out, depth, key, scalar),
        Value::Scalars(items) => {
            for item in items {
                write_line(out, depth, block_key, item);
            }
        }
        Value::Section(section) if keys::is_typed_context(key) => {
            write_typed(out, depth, key, section)
        }
        Value::Section(section) => {
            open(out, depth, key, None);
            write_body(out, depth + 1, section, None);
            close(out, depth);
        }
        Value::Sections(sections) => {
            for section in sections {
                let name = section.get(NAME_KEY).and_then(Value::as_scalar);
                open(out, depth, block_key, name);
                write_body(out, depth + 1, section, name.map(|_| NAME_KEY));
                close(out, depth);
            }
        }
    }
}

/// `storage-engine memory` for a bare type, `storage-engine device { … }` otherwise
fn write_typed(out: &mut String, depth: usize, key: &str, section: &Section) {
    let kind = section.get(TYPE_KEY).and_then(Value::as_scalar);
    if let Some(kind) = kind {
        if section.len() == 1 {
            write_line(out, depth, key, kind);
            return;
        }
    }
    open(out, depth, key, kind);
    write_body(out, depth + 1, section, kind.map(|_| TYPE_KEY));
    close(out, depth);
}

fn write_logging(out: &mut String, sinks: &[Section]) {
    open(out, 0, keys::LOGGING, None);
    for sink in sinks {
        let name = sink.get(NAME_KEY).and_then(Value::as_scalar);
        match name {
            Some(Scalar::Str(sink_kind)) if keys::LOGGING_SINKS.contains(&sink_kind.as_str()) => {
                open(out, 1, sink_kind, None);
            }
            Some(path) => open(out, 1, keys::LOGGING_FILE, Some(path)),
            None => open(out, 1, keys::LOGGING_FILE, None),
        }

        for (key, value) in sink.iter() {
            if key == NAME_KEY {
                continue;
            }
            match value {
                Value::Scalar(level) if !keys::LOGGING_SINK_DIRECTIVES.contains(&key.as_str()) => {
                    indent(out, 2);
                    let _ = writeln!(out, "{} {key} {level}", keys::LOGGING_CONTEXT);
                }
                other => write_entry(out, 2, key, other),
            }
        }
        close(out, 1);
    }
    close(out, 0);
}
