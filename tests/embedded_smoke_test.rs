//! On-target checks of the aggregation and history cores for xtensa/ESP32.

#![no_std]
#![no_main]

#[cfg(test)]
#[embedded_test::tests(executor = esp_rtos::embassy::Executor::new())]
mod tests {
    use airscope::app::{
        history::{SignalHistory, SAMPLE_LOST},
        survey::SurveyStore,
        types::{ScanHit, SecurityMode},
    };

    #[init]
    fn init() {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        esp_alloc::heap_allocator!(size: 16 * 1024);
        let timg0 = esp_hal::timer::timg::TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);
    }

    fn hit(ssid: &str, signal_dbm: i8) -> ScanHit {
        ScanHit {
            ssid: ssid.try_into().unwrap(),
            signal_dbm,
            channel: 6,
            security: SecurityMode::Wpa2,
        }
    }

    #[test]
    async fn survey_separates_mesh_duplicates_from_new_cycles() {
        let mut store = SurveyStore::new();
        store.begin_epoch();
        store.merge(&hit("alpha", -40), 0);
        store.merge(&hit("bravo", -50), 0);
        store.merge(&hit("alpha", -44), 0);
        store.begin_epoch();
        store.merge(&hit("alpha", -42), 1_000);

        assert_eq!(store.len(), 2);
        let alpha = store.record(0).unwrap();
        assert_eq!(alpha.total_sightings, 3);
        assert_eq!(alpha.mesh_peak, 2);
        assert_eq!(alpha.unique_cycle_hits, 2);
        assert_eq!(alpha.average_rssi(), -42);
    }

    #[test]
    async fn history_tracks_bounds_and_lost_probes() {
        embassy_time::Timer::after(embassy_time::Duration::from_millis(10)).await;

        let mut history = SignalHistory::new();
        history.push(SAMPLE_LOST);
        assert!(!history.has_readings());
        history.push(-48);
        history.push(-60);
        assert_eq!(history.min_dbm(), -60);
        assert_eq!(history.max_dbm(), -48);
        let (average, lost_percent) = history.window_stats();
        assert_eq!(average, -54);
        assert_eq!(lost_percent, 33);
    }
}
