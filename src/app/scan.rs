use alloc::vec::Vec;

use embassy_time::Duration;
use esp_println::println;
use esp_radio::wifi::{
    AccessPointInfo, AuthMethod, ClientConfig, Config as WifiRuntimeConfig, ModeConfig, ScanConfig,
    ScanTypeConfig, WifiController,
};
use static_cell::StaticCell;

use super::{
    config::{PROBE_DWELL_MS, SCAN_ACTIVE_MAX_MS, SCAN_ACTIVE_MIN_MS, SCAN_MAX_APS},
    types::{ScanHit, SecurityMode, SSID_MAX},
};

/// Station-mode radio used purely for scanning; it never associates.
pub(crate) struct Radio {
    controller: WifiController<'static>,
}

pub(crate) fn setup(wifi: esp_hal::peripherals::WIFI<'static>) -> Result<Radio, &'static str> {
    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();

    let radio_ctrl = esp_radio::init().map_err(|_| "radio: esp_radio::init failed")?;
    let radio_ctrl = RADIO_CTRL.init(radio_ctrl);
    let (controller, _ifaces) =
        esp_radio::wifi::new(radio_ctrl, wifi, WifiRuntimeConfig::default())
            .map_err(|_| "radio: wifi init failed")?;
    Ok(Radio { controller })
}

impl Radio {
    pub(crate) async fn start(&mut self) -> Result<(), &'static str> {
        self.controller
            .set_config(&ModeConfig::Client(ClientConfig::default()))
            .map_err(|_| "radio: station config failed")?;
        self.controller
            .start_async()
            .await
            .map_err(|_| "radio: start failed")?;
        Ok(())
    }

    /// Full survey of every visible network. A scan error is logged and
    /// reported as an empty result; the next cycle retries naturally.
    pub(crate) async fn scan_all(&mut self) -> Vec<ScanHit> {
        let config = ScanConfig::default()
            .with_show_hidden(false)
            .with_max(SCAN_MAX_APS)
            .with_scan_type(ScanTypeConfig::Active {
                min: Duration::from_millis(SCAN_ACTIVE_MIN_MS).into(),
                max: Duration::from_millis(SCAN_ACTIVE_MAX_MS).into(),
            });
        match self.controller.scan_with_config_async(config).await {
            Ok(access_points) => access_points
                .iter()
                .filter(|ap| !ap.ssid.is_empty())
                .map(hit_from_access_point)
                .collect(),
            Err(err) => {
                println!("scan: survey err={:?}", err);
                Vec::new()
            }
        }
    }

    /// Targeted probe of one network on its last-known channel, bounded by
    /// the probe dwell. `None` means "not seen this cycle".
    pub(crate) async fn scan_one(&mut self, ssid: &str, channel: u8) -> Option<i8> {
        let config = ScanConfig::default()
            .with_ssid(ssid)
            .with_channel(channel)
            .with_max(1)
            .with_scan_type(ScanTypeConfig::Active {
                min: Duration::from_millis(PROBE_DWELL_MS / 2).into(),
                max: Duration::from_millis(PROBE_DWELL_MS).into(),
            });
        match self.controller.scan_with_config_async(config).await {
            Ok(access_points) => access_points.first().map(|ap| ap.signal_strength),
            Err(err) => {
                println!("scan: probe ssid={} err={:?}", ssid, err);
                None
            }
        }
    }
}

fn hit_from_access_point(ap: &AccessPointInfo) -> ScanHit {
    let mut ssid = heapless::String::<SSID_MAX>::new();
    for ch in ap.ssid.chars() {
        if ssid.push(ch).is_err() {
            break;
        }
    }
    ScanHit {
        ssid,
        signal_dbm: ap.signal_strength,
        channel: ap.channel,
        security: security_mode_from_auth(ap.auth_method),
    }
}

fn security_mode_from_auth(auth: Option<AuthMethod>) -> SecurityMode {
    match auth {
        Some(AuthMethod::None) => SecurityMode::Open,
        Some(AuthMethod::Wep) => SecurityMode::Wep,
        Some(AuthMethod::Wpa) => SecurityMode::Wpa,
        Some(AuthMethod::Wpa2Personal) => SecurityMode::Wpa2,
        Some(AuthMethod::WpaWpa2Personal) => SecurityMode::WpaWpa2,
        Some(AuthMethod::Wpa2Enterprise) => SecurityMode::WpaEnterprise,
        Some(AuthMethod::Wpa3Personal) => SecurityMode::Wpa3,
        Some(AuthMethod::Wpa2Wpa3Personal) => SecurityMode::Wpa2Wpa3,
        Some(AuthMethod::WapiPersonal) => SecurityMode::Wapi,
        Some(_) | None => SecurityMode::Unknown,
    }
}
