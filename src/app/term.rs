use core::fmt::Write;

use embassy_time::{with_timeout, Duration};

use super::{
    config::{TERM_REPLY_MAX, TERM_REPLY_TIMEOUT_MS},
    types::SerialUart,
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextStyle {
    Normal,
    Bold,
    Underlined,
    Blink,
    Inverse,
}

impl TextStyle {
    fn code(self) -> u8 {
        match self {
            TextStyle::Normal => 0,
            TextStyle::Bold => 1,
            TextStyle::Underlined => 4,
            TextStyle::Blink => 5,
            TextStyle::Inverse => 7,
        }
    }
}

pub(crate) async fn uart_write_all(uart: &mut SerialUart, mut bytes: &[u8]) -> bool {
    while !bytes.is_empty() {
        match uart.write_async(bytes).await {
            Ok(0) => return false,
            Ok(written) => bytes = &bytes[written..],
            Err(_) => return false,
        }
    }
    true
}

/// Discards whatever input bytes are already queued, so a stale keystroke
/// cannot be mistaken for the head of the attributes reply.
pub(crate) async fn drain_stale_input(uart: &mut SerialUart) {
    let mut byte = [0u8; 1];
    while let Ok(Ok(n)) = with_timeout(Duration::from_millis(2), uart.read_async(&mut byte)).await {
        if n == 0 {
            break;
        }
    }
}

/// Sends the device attributes query and waits for a reply, bounded by
/// `TERM_REPLY_TIMEOUT_MS`. Returns the parsed terminal class; `None` is a
/// negative probe (no reply, or a reply this code does not understand).
pub(crate) async fn probe_terminal(uart: &mut SerialUart) -> Option<u8> {
    drain_stale_input(uart).await;
    if !uart_write_all(uart, b"\x1b[c").await {
        return None;
    }

    let reply = with_timeout(
        Duration::from_millis(TERM_REPLY_TIMEOUT_MS),
        read_reply_until_terminator(uart),
    )
    .await
    .ok()?;
    parse_device_attributes(&reply)
}

async fn read_reply_until_terminator(uart: &mut SerialUart) -> heapless::Vec<u8, TERM_REPLY_MAX> {
    let mut reply = heapless::Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match uart.read_async(&mut byte).await {
            Ok(n) if n > 0 => {
                if byte[0] == b'c' {
                    return reply;
                }
                if reply.push(byte[0]).is_err() {
                    return reply;
                }
            }
            _ => return reply,
        }
    }
}

/// Reply body (terminator already stripped) looks like `ESC [ ? 1 ; 2`;
/// the first digit group is the terminal class.
pub(crate) fn parse_device_attributes(reply: &[u8]) -> Option<u8> {
    let fields = reply.strip_prefix(b"\x1b[?")?;
    let separator = fields.iter().position(|&b| b == b';')?;
    let digits = &fields[..separator];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut class = 0u8;
    for &digit in digits {
        class = class.saturating_mul(10).saturating_add(digit - b'0');
    }
    Some(class)
}

/// Cursor-addressed output primitives. Unbuffered: every call goes straight
/// to the UART; incremental repainting is the renderers' business.
pub(crate) struct Vt100<'u> {
    uart: &'u mut SerialUart,
}

impl<'u> Vt100<'u> {
    pub(crate) fn new(uart: &'u mut SerialUart) -> Self {
        Self { uart }
    }

    pub(crate) async fn enter(&mut self) {
        // 7-bit control codes, no visible or highlighted cursor.
        let _ = uart_write_all(self.uart, b"\x1b F\x1b[?25l\x1b[?12l").await;
        self.clear().await;
    }

    pub(crate) async fn leave(&mut self) {
        self.clear().await;
        let _ = uart_write_all(self.uart, b"\x1b[?25h\x1b[?12h\x1b G").await;
    }

    pub(crate) async fn clear(&mut self) {
        let _ = uart_write_all(self.uart, b"\x1b[2J").await;
    }

    /// 1-based row/column.
    pub(crate) async fn move_to(&mut self, row: u16, col: u16) {
        let mut sequence = heapless::String::<16>::new();
        let _ = write!(&mut sequence, "\x1b[{row};{col}f");
        let _ = uart_write_all(self.uart, sequence.as_bytes()).await;
    }

    pub(crate) async fn set_style(&mut self, style: TextStyle) {
        let mut sequence = heapless::String::<8>::new();
        let _ = write!(&mut sequence, "\x1b[{}m", style.code());
        let _ = uart_write_all(self.uart, sequence.as_bytes()).await;
    }

    pub(crate) async fn print(&mut self, text: &str) {
        let _ = uart_write_all(self.uart, text.as_bytes()).await;
    }

    pub(crate) async fn print_at(&mut self, row: u16, col: u16, style: TextStyle, text: &str) {
        self.set_style(style).await;
        self.move_to(row, col).await;
        self.print(text).await;
    }
}

#[cfg(test)]
mod tests {
    use super::parse_device_attributes;

    #[test]
    fn vt100_with_avo_reply() {
        // minicom answers ESC [ ? 1 ; 2 c
        assert_eq!(parse_device_attributes(b"\x1b[?1;2"), Some(1));
    }

    #[test]
    fn vt220_reply_keeps_full_class() {
        // GTKTerm answers ESC [ ? 62 ; 3 c
        assert_eq!(parse_device_attributes(b"\x1b[?62;3"), Some(62));
    }

    #[test]
    fn empty_reply_is_negative() {
        assert_eq!(parse_device_attributes(b""), None);
    }

    #[test]
    fn wrong_prefix_is_negative() {
        assert_eq!(parse_device_attributes(b"[?1;2"), None);
        assert_eq!(parse_device_attributes(b"\x1b[1;2"), None);
    }

    #[test]
    fn missing_separator_is_negative() {
        assert_eq!(parse_device_attributes(b"\x1b[?1"), None);
    }

    #[test]
    fn empty_class_field_is_negative() {
        assert_eq!(parse_device_attributes(b"\x1b[?;2"), None);
    }
}
