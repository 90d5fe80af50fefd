pub mod cpu;
pub mod error;
pub mod kill;
pub mod meminfo;
pub mod numparse;
pub mod platform;
pub mod process;
pub mod procfs;
pub mod rates;
pub mod sort;

/// Truncates `s` to at most `max_bytes` without splitting a character.
pub(crate) fn bounded(mut s: String, max_bytes: usize) -> String {
    if s.len() > max_bytes {
        let mut cut = max_bytes;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}
