//! Human-readable text conversions.
//!
//! These helpers derive the display text attached to metadata values:
//! byte counts, timestamps, and POSIX file modes all have a canonical
//! human rendering that downstream tooling parses out of the plaintext
//! export, so the exact output of each function is part of the crate's
//! de facto contract.

use bitflags::bitflags;
use chrono::{DateTime, Utc};

bitflags! {
    /// POSIX file mode bits, as stored in tar headers and `stat` results.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileMode: u32 {
        const SUID = 0o4000;
        const SGID = 0o2000;
        const STICKY = 0o1000;
        const R_USR = 0o400;
        const W_USR = 0o200;
        const X_USR = 0o100;
        const R_GRP = 0o040;
        const W_GRP = 0o020;
        const X_GRP = 0o010;
        const R_OTH = 0o004;
        const W_OTH = 0o002;
        const X_OTH = 0o001;
    }
}

/// File type mask of a full mode word (the bits above the permission bits).
const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFCHR: u32 = 0o020000;
const S_IFDIR: u32 = 0o040000;
const S_IFIFO: u32 = 0o010000;
const S_IFLNK: u32 = 0o120000;
const S_IFSOCK: u32 = 0o140000;

/// Convert a byte count to a human-readable size string.
///
/// Counts below 10000 are rendered verbatim; larger counts step through
/// binary units with one decimal.
///
/// # Examples
///
/// ```
/// use rambutan::common::text::human_filesize;
///
/// assert_eq!(human_filesize(300), "300 bytes");
/// assert_eq!(human_filesize(16 * 1024 * 1024), "16.0 MB");
/// ```
pub fn human_filesize(size: u64) -> String {
    if size < 10000 {
        return format!("{size} bytes");
    }
    let mut size = size as f64;
    for unit in ["KB", "MB", "GB"] {
        size /= 1024.0;
        if size < 10000.0 {
            return format!("{size:.1} {unit}");
        }
    }
    format!("{:.1} TB", size / 1024.0)
}

/// Convert a Unix file mode to a `ls -l` style attribute string.
///
/// The output is the file type letter, the nine permission characters
/// (with setuid/setgid/sticky folded into the execute slots), and the
/// octal permission bits in parentheses.
///
/// # Examples
///
/// ```
/// use rambutan::common::text::human_unix_attributes;
///
/// assert_eq!(human_unix_attributes(0o644), "-rw-r--r-- (644)");
/// assert_eq!(human_unix_attributes(0o2755), "-rwxr-sr-x (2755)");
/// ```
pub fn human_unix_attributes(mode: u32) -> String {
    let mode_flags = FileMode::from_bits_truncate(mode);
    let mut chars = [file_type_letter(mode), '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let perms = [
        FileMode::R_USR,
        FileMode::W_USR,
        FileMode::X_USR,
        FileMode::R_GRP,
        FileMode::W_GRP,
        FileMode::X_GRP,
        FileMode::R_OTH,
        FileMode::W_OTH,
        FileMode::X_OTH,
    ];
    for (i, flag) in perms.iter().enumerate() {
        if mode_flags.contains(*flag) {
            chars[i + 1] = ['r', 'w', 'x'][i % 3];
        }
    }
    if mode_flags.contains(FileMode::SUID) {
        chars[3] = if chars[3] == 'x' { 's' } else { 'S' };
    }
    if mode_flags.contains(FileMode::SGID) {
        chars[6] = if chars[6] == 'x' { 's' } else { 'S' };
    }
    if mode_flags.contains(FileMode::STICKY) {
        chars[9] = if chars[9] == 'x' { 't' } else { 'T' };
    }
    let text: String = chars.iter().collect();
    format!("{} ({:o})", text, mode & 0o7777)
}

fn file_type_letter(mode: u32) -> char {
    match mode & S_IFMT {
        S_IFREG | 0 => '-',
        S_IFBLK => 'b',
        S_IFCHR => 'c',
        S_IFDIR => 'd',
        S_IFIFO => 'p',
        S_IFLNK => 'l',
        S_IFSOCK => 's',
        _ => '?',
    }
}

/// Render a timestamp in the canonical `YYYY-MM-DD HH:MM:SS` form.
pub fn human_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Replace control characters so a string is safe for single-line output.
///
/// Tabs, newlines, and other control characters are rendered as their
/// escaped form; everything else passes through unchanged.
pub fn make_printable(text: &str) -> String {
    if text.chars().all(|c| !c.is_control()) {
        return text.to_string();
    }
    text.chars()
        .map(|c| {
            if c.is_control() {
                c.escape_default().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}
