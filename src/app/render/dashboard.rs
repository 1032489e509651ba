use core::fmt::Write;

use super::{
    super::{
        config::{LOG_ROW_BUDGET, STALE_AFTER_SECONDS},
        survey::{NetworkRecord, SurveyStore},
        term::{uart_write_all, TextStyle, Vt100},
        types::{SerialUart, ViewMode},
    },
    display_name,
};

const HEADER_TOP: &str = "╔════╦════════════════════════════════╦═══════╦═══════╦═══════════╗";
const HEADER_TITLE: &str = "║ ## ║ Network name                   ║ RSSI  ║ Avg   ║ Del./lost ║";
const HEADER_SEP: &str = "╠════╬════════════════════════════════╬═══════╬═══════╬═══════════╣";
const ROW_BLANK: &str = "║    ║                                ║       ║       ║           ║";
const BOTTOM: &str = "╚════╩════════════════════════════════╩═══════╩═══════╩═══════════╝";

const COL_RANK: u16 = 3;
const COL_NAME: u16 = 8;
const COL_SECURITY: u16 = 34;
const COL_RSSI: u16 = 41;
const COL_AVG: u16 = 49;
const COL_LOSS: u16 = 57;
const COL_MESH: u16 = 70;
const FIRST_DATA_ROW: u16 = 4;

/// Table view over the survey store. Borders are painted once and extended
/// as records appear; per-cycle work rewrites only the content cells, each
/// space-padded to its fixed width so stale characters never survive.
pub(crate) struct DashboardRenderer {
    painted_rows: usize,
}

impl DashboardRenderer {
    pub(crate) const fn new() -> Self {
        Self { painted_rows: 0 }
    }

    pub(crate) async fn draw_frame(&mut self, term: &mut Vt100<'_>, record_count: usize) {
        term.clear().await;
        term.print_at(1, 1, TextStyle::Bold, HEADER_TOP).await;
        term.print_at(2, 1, TextStyle::Bold, HEADER_TITLE).await;
        term.print_at(3, 1, TextStyle::Normal, HEADER_SEP).await;
        for row in 0..record_count {
            term.print_at(FIRST_DATA_ROW + row as u16, 1, TextStyle::Normal, ROW_BLANK)
                .await;
        }
        term.print_at(FIRST_DATA_ROW + record_count as u16, 1, TextStyle::Normal, BOTTOM)
            .await;
        self.painted_rows = record_count;
    }

    pub(crate) async fn draw(
        &mut self,
        term: &mut Vt100<'_>,
        store: &mut SurveyStore,
        view_mode: ViewMode,
        found: usize,
        uptime_seconds: u64,
        now_ms: u64,
    ) {
        store.sort_best_first();
        let record_count = store.len();

        if self.painted_rows != record_count {
            term.print_at(FIRST_DATA_ROW + record_count as u16, 1, TextStyle::Normal, BOTTOM)
                .await;
            while self.painted_rows < record_count {
                term.print_at(
                    FIRST_DATA_ROW + self.painted_rows as u16,
                    1,
                    TextStyle::Normal,
                    ROW_BLANK,
                )
                .await;
                self.painted_rows += 1;
            }
            self.painted_rows = record_count;
        }

        for (index, record) in store.records().iter().enumerate() {
            let row = FIRST_DATA_ROW + index as u16;
            let mut cell = heapless::String::<40>::new();

            let _ = write!(&mut cell, "{:<3}", index + 1);
            term.print_at(row, COL_RANK, TextStyle::Normal, &cell).await;

            cell.clear();
            let _ = write!(&mut cell, "{:<30}", display_name(&record.ssid).as_str());
            term.print_at(row, COL_NAME, TextStyle::Normal, &cell).await;

            cell.clear();
            let _ = write!(&mut cell, "{:<4}", record.security.label());
            term.print_at(row, COL_SECURITY, TextStyle::Normal, &cell).await;

            cell.clear();
            let _ = write!(&mut cell, "{:<5}", record.last_rssi);
            term.print_at(row, COL_RSSI, TextStyle::Normal, &cell).await;

            cell.clear();
            let _ = write!(&mut cell, "{:<5}", record.average_rssi());
            term.print_at(row, COL_AVG, TextStyle::Normal, &cell).await;

            cell.clear();
            let idle = record.idle_seconds(now_ms);
            if idle > STALE_AFTER_SECONDS {
                let _ = write!(&mut cell, "{idle} s");
            } else {
                let _ = write!(&mut cell, "{}%", record.loss_percent());
            }
            while cell.len() < 9 {
                let _ = cell.push(' ');
            }
            term.print_at(row, COL_LOSS, TextStyle::Normal, &cell).await;

            cell.clear();
            if view_mode == ViewMode::Extended && record.mesh_peak > 1 {
                let _ = write!(&mut cell, "mesh {:<3}", record.mesh_peak);
            } else {
                let _ = write!(&mut cell, "{:8}", "");
            }
            term.print_at(row, COL_MESH, TextStyle::Normal, &cell).await;
        }

        let mut footer = heapless::String::<72>::new();
        let _ = write!(
            &mut footer,
            "found {found} networks; uptime {uptime_seconds} seconds      "
        );
        term.print_at(FIRST_DATA_ROW + record_count as u16 + 1, 1, TextStyle::Normal, &footer)
            .await;
    }

    /// Plain line-oriented fallback for terminals that failed negotiation:
    /// worst signal first, trailing records only, so the interesting end of
    /// the ranking lands at the bottom of a dumb scrollback.
    pub(crate) async fn log(
        &self,
        uart: &mut SerialUart,
        store: &mut SurveyStore,
        view_mode: ViewMode,
        found: usize,
        uptime_seconds: u64,
        now_ms: u64,
    ) {
        store.sort_worst_first();

        let mut line = heapless::String::<128>::new();
        let _ = write!(
            &mut line,
            "========{uptime_seconds} sec; {found} networks=====\r\n"
        );
        let _ = uart_write_all(uart, line.as_bytes()).await;

        line.clear();
        if view_mode == ViewMode::Extended {
            let _ = write!(
                &mut line,
                "#  | RSSI | Avg  | lost | delay | mesh | cnt | encr | Name\r\n"
            );
        } else {
            let _ = write!(&mut line, "#  | RSSI | Avg  | lost | delay | Name\r\n");
        }
        let _ = uart_write_all(uart, line.as_bytes()).await;

        let record_count = store.len();
        for (index, record) in store.records().iter().enumerate() {
            if index + LOG_ROW_BUDGET < record_count {
                continue;
            }
            line.clear();
            write_log_record(&mut line, index + 1, record, view_mode, now_ms);
            let _ = uart_write_all(uart, line.as_bytes()).await;
        }
    }
}

fn write_log_record(
    line: &mut heapless::String<128>,
    rank: usize,
    record: &NetworkRecord,
    view_mode: ViewMode,
    now_ms: u64,
) {
    let _ = write!(
        line,
        "{:02} | {:>4} | {:>4} | {:>3}% | {:>5} |",
        rank,
        record.last_rssi,
        record.average_rssi(),
        record.loss_percent(),
        record.idle_seconds(now_ms),
    );
    if view_mode == ViewMode::Extended {
        let _ = write!(
            line,
            "  {:02}  | {:>3} | {:<4} |",
            record.mesh_peak,
            record.unique_cycle_hits,
            record.security.label(),
        );
    }
    let _ = write!(line, " {}\r\n", display_name(&record.ssid));
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    use crate::app::types::{ScanHit, SecurityMode};

    fn hit(ssid: &str, signal_dbm: i8) -> ScanHit {
        ScanHit {
            ssid: ssid.try_into().unwrap(),
            signal_dbm,
            channel: 1,
            security: SecurityMode::Open,
        }
    }

    #[test]
    fn log_record_has_fixed_compact_columns() {
        let mut store = SurveyStore::new();
        store.begin_epoch();
        store.merge(&hit("net", -67), 0);

        let mut line = heapless::String::<128>::new();
        write_log_record(&mut line, 1, store.record(0).unwrap(), ViewMode::Compact, 5_000);
        assert_eq!(line.as_str(), "01 |  -67 |  -67 |   0% |     5 | net\r\n");
    }

    #[test]
    fn log_record_extended_adds_mesh_and_security() {
        let mut store = SurveyStore::new();
        store.begin_epoch();
        store.merge(&hit("net", -67), 0);
        store.merge(&hit("net", -68), 0);

        let mut line = heapless::String::<128>::new();
        write_log_record(&mut line, 1, store.record(0).unwrap(), ViewMode::Extended, 0);
        assert!(line.contains("|  02  |"));
        assert!(line.contains("| Open |"));
    }

    #[test]
    fn padded_cells_cover_previous_content() {
        // Widths must not depend on the value: a shrinking number has to
        // blank the tail of its predecessor.
        let mut short = heapless::String::<16>::new();
        let _ = write!(&mut short, "{:<5}", -7i8);
        let mut long = heapless::String::<16>::new();
        let _ = write!(&mut long, "{:<5}", -100i8);
        assert_eq!(short.len(), 5);
        assert_eq!(long.len(), 5);
    }
}
