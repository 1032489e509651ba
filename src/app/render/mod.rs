pub(crate) mod chart;
pub(crate) mod dashboard;

use super::config::NAME_COLS;

/// Clips an SSID to the table's name column and substitutes every byte
/// outside printable 7-bit ASCII, so a hostile name can never push the
/// terminal's decoder out of sync.
pub(crate) fn display_name(ssid: &str) -> heapless::String<NAME_COLS> {
    let mut out = heapless::String::new();
    for &byte in ssid.as_bytes().iter().take(NAME_COLS) {
        let ch = if (0x20..=0x7e).contains(&byte) {
            byte as char
        } else {
            '?'
        };
        let _ = out.push(ch);
    }
    out
}
