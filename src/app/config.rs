pub(crate) const UART_BAUD: u32 = 115_200;
pub(crate) const HEAP_BYTES: usize = 72 * 1024;

pub(crate) const POLL_DELAY_DEFAULT_MS: u32 = 1_000;
pub(crate) const POLL_DELAY_STEP_MS: u32 = 100;
pub(crate) const POLL_DELAY_MIN_MS: u32 = 100;

pub(crate) const HISTORY_CAPACITY: usize = 50;
// Inverted on purpose: min > max means "no reading yet", and the first real
// sample (always negative dBm) snaps both bounds onto itself.
pub(crate) const HISTORY_MIN_RESET_DBM: i8 = 0;
pub(crate) const HISTORY_MAX_RESET_DBM: i8 = -127;

// Active scan dwell is per channel.
pub(crate) const SCAN_ACTIVE_MIN_MS: u64 = 50;
pub(crate) const SCAN_ACTIVE_MAX_MS: u64 = 120;
pub(crate) const SCAN_MAX_APS: usize = 64;
pub(crate) const PROBE_DWELL_MS: u64 = 300;

pub(crate) const TERM_REPLY_TIMEOUT_MS: u64 = 500;
pub(crate) const TERM_REPLY_MAX: usize = 16;

pub(crate) const STALE_AFTER_SECONDS: u64 = 60;
pub(crate) const NAME_COLS: usize = 30;
pub(crate) const LOG_ROW_BUDGET: usize = 32;
pub(crate) const CMD_BUF_LEN: usize = 8;
