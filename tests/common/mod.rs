#![allow(dead_code)]

use logchain::chain::{digest_hex, GENESIS_DIGEST};
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp token of exactly 26 characters for record `i`
pub fn timestamp(i: usize) -> String {
    format!("2024-01-01T{:02}:{:02}:{:02}.{:06}", (i / 3600) % 24, (i / 60) % 60, i % 60, i)
}

/// Build a valid chain of `n` records
pub fn build_chain(n: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::with_capacity(n);
    for i in 0..n {
        let digest = match lines.last() {
            Some(prev) => digest_hex(prev.as_bytes()),
            None => GENESIS_DIGEST.to_string(),
        };
        lines.push(format!("{} {}", timestamp(i), digest));
    }
    lines
}

/// Newline-terminated log text
pub fn render(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    if !lines.is_empty() {
        text.push('\n');
    }
    text
}

/// Write `lines` as a log file under `dir`
pub fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, render(lines)).expect("Failed to write test log");
    path
}

/// Flip one character of record `index` at byte `offset`
pub fn flip_char(lines: &mut [String], index: usize, offset: usize) {
    let mut bytes = lines[index].clone().into_bytes();
    bytes[offset] = if bytes[offset] == b'0' { b'1' } else { b'0' };
    lines[index] = String::from_utf8(bytes).expect("ASCII record");
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
