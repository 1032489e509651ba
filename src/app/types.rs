use esp_hal::{uart::Uart, Async};

use super::config::CMD_BUF_LEN;

pub(crate) type SerialUart = Uart<'static, Async>;

pub const SSID_MAX: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecurityMode {
    Open,
    Wep,
    Wpa,
    Wpa2,
    WpaWpa2,
    WpaEnterprise,
    Wpa3,
    Wpa2Wpa3,
    Wapi,
    Unknown,
}

impl SecurityMode {
    pub fn label(self) -> &'static str {
        match self {
            SecurityMode::Open => "Open",
            SecurityMode::Wep => "WEP",
            SecurityMode::Wpa => "WPA",
            SecurityMode::Wpa2 => "WPA2",
            SecurityMode::WpaWpa2 => "WPA*",
            SecurityMode::WpaEnterprise => "WPAE",
            SecurityMode::Wpa3 => "WPA3",
            SecurityMode::Wpa2Wpa3 => "WPA+",
            SecurityMode::Wapi => "WPAI",
            SecurityMode::Unknown => "UNKN",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScanHit {
    pub ssid: heapless::String<SSID_MAX>,
    pub signal_dbm: i8,
    pub channel: u8,
    pub security: SecurityMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ViewMode {
    Compact,
    Extended,
}

impl ViewMode {
    pub(crate) fn cycled(self) -> Self {
        match self {
            ViewMode::Compact => ViewMode::Extended,
            ViewMode::Extended => ViewMode::Compact,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChartStyle {
    Sparkline,
    BarRows,
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ChartTarget {
    pub(crate) ssid: heapless::String<SSID_MAX>,
    pub(crate) channel: u8,
}

/// View resolved once per cycle and matched explicitly by the session loop.
#[derive(Clone)]
pub(crate) enum SessionView {
    Dashboard,
    Chart {
        target: ChartTarget,
        style: ChartStyle,
    },
}

pub(crate) struct SessionState {
    pub(crate) selection: Option<ChartTarget>,
    pub(crate) poll_delay_ms: u32,
    pub(crate) view_mode: ViewMode,
    pub(crate) term_enabled: bool,
    pub(crate) pending: heapless::String<CMD_BUF_LEN>,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            selection: None,
            poll_delay_ms: super::config::POLL_DELAY_DEFAULT_MS,
            view_mode: ViewMode::Compact,
            term_enabled: false,
            pending: heapless::String::new(),
        }
    }

    pub(crate) fn view(&self) -> SessionView {
        match &self.selection {
            None => SessionView::Dashboard,
            Some(target) => SessionView::Chart {
                target: target.clone(),
                style: match self.view_mode {
                    ViewMode::Compact => ChartStyle::Sparkline,
                    ViewMode::Extended => ChartStyle::BarRows,
                },
            },
        }
    }
}
