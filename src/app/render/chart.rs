use core::fmt::Write;

use super::{
    super::{
        config::{HISTORY_CAPACITY, HISTORY_MAX_RESET_DBM, HISTORY_MIN_RESET_DBM},
        history::{SignalHistory, SAMPLE_LOST},
        term::{uart_write_all, TextStyle, Vt100},
        types::SerialUart,
    },
    display_name,
};

const BOX_TOP: &str = "╔═════════════════════════════════════════════════════════════════╗";
const BOX_INNER: &str = "║                                                                 ║";
const BOX_SEP: &str = "╠═════════════════════════════════════════════════════════════════╣";
const BOX_BOTTOM: &str = "╚═════════════════════════════════════════════════════════════════╝";

const COL_TITLE: u16 = 3;
const COL_STATS: u16 = 45;
const STATS_WIDTH: usize = 21;
const COL_TICK_LEFT: u16 = 3;
const COL_TICK_RIGHT: u16 = 63;
const COL_DATA_BASE: u16 = 10;
const FIRST_BODY_ROW: u16 = 4;
const BAR_COL_VALUE: u16 = 1;
const BAR_COL_START: u16 = 5;
const BAR_WIDTH: usize = 50;

/// Rows needed to plot the closed range at two signal levels per row.
/// Zero while the bounds are still inverted (no real sample yet).
fn body_rows(min_dbm: i8, max_dbm: i8) -> u16 {
    if max_dbm < min_dbm {
        return 0;
    }
    let span = (i16::from(max_dbm) - i16::from(min_dbm) + 1) as u16;
    span / 2 + span % 2
}

/// Linear map onto the bar column budget: lowest reading gets one cell,
/// highest the full width. A collapsed range parks everything mid-scale.
fn bar_len(sample: i8, min_dbm: i8, max_dbm: i8) -> usize {
    if sample == SAMPLE_LOST {
        return 0;
    }
    if max_dbm == min_dbm {
        return BAR_WIDTH / 2;
    }
    let sample = i32::from(sample);
    let min = i32::from(min_dbm);
    let max = i32::from(max_dbm);
    ((BAR_WIDTH as i32 - 1) * (sample - min) / (max - min) + 1).clamp(0, BAR_WIDTH as i32) as usize
}

/// Half-row placement: level 2k+1 is the lower block of the row above
/// level 2k's upper block. The top half-step of an even span folds into
/// the top row.
fn sparkline_cell(sample: i8, min_dbm: i8, rows: u16) -> (u16, &'static str) {
    let level = (i16::from(sample) - i16::from(min_dbm)).max(0) as u16;
    let offset = level / 2 + level % 2;
    let row = (rows - 1).saturating_sub(offset);
    let glyph = if level % 2 == 1 { "▄" } else { "▀" };
    (row, glyph)
}

/// Signal-history view for one selected network. Owns the per-column
/// repaint memory and the bounds of the last painted frame.
pub(crate) struct ChartRenderer {
    previous_row: [u16; HISTORY_CAPACITY],
    frame_min: i8,
    frame_max: i8,
    frame_drawn: bool,
}

impl ChartRenderer {
    pub(crate) const fn new() -> Self {
        Self {
            previous_row: [0; HISTORY_CAPACITY],
            frame_min: HISTORY_MIN_RESET_DBM,
            frame_max: HISTORY_MAX_RESET_DBM,
            frame_drawn: false,
        }
    }

    /// Full frame repaint, used on selection and terminal re-enable.
    pub(crate) async fn draw_frame(
        &mut self,
        term: &mut Vt100<'_>,
        ssid: &str,
        history: &SignalHistory,
    ) {
        term.clear().await;
        term.print_at(1, 1, TextStyle::Normal, BOX_TOP).await;
        term.print_at(2, 1, TextStyle::Normal, BOX_INNER).await;
        term.print_at(3, 1, TextStyle::Normal, BOX_SEP).await;

        self.frame_min = history.min_dbm();
        self.frame_max = history.max_dbm();
        let rows = body_rows(self.frame_min, self.frame_max);
        for row in 0..rows {
            term.print_at(FIRST_BODY_ROW + row, 1, TextStyle::Normal, BOX_INNER)
                .await;
        }
        term.print_at(FIRST_BODY_ROW + rows, 1, TextStyle::Normal, BOX_BOTTOM)
            .await;
        term.print_at(2, COL_TITLE, TextStyle::Bold, display_name(ssid).as_str())
            .await;
        self.draw_ticks(term, rows).await;
        self.previous_row = [0; HISTORY_CAPACITY];
        self.frame_drawn = true;
    }

    /// The frame height is a function of the observed range, so a range
    /// change moves the bottom border before the ticks are rewritten.
    async fn refresh_frame_if_needed(&mut self, term: &mut Vt100<'_>, history: &SignalHistory) {
        if self.frame_drawn
            && self.frame_min == history.min_dbm()
            && self.frame_max == history.max_dbm()
        {
            return;
        }
        let old_rows = if self.frame_drawn {
            body_rows(self.frame_min, self.frame_max)
        } else {
            0
        };
        self.frame_min = history.min_dbm();
        self.frame_max = history.max_dbm();
        let rows = body_rows(self.frame_min, self.frame_max);
        if old_rows != rows {
            term.print_at(FIRST_BODY_ROW + old_rows, 1, TextStyle::Normal, BOX_INNER)
                .await;
            term.print_at(FIRST_BODY_ROW + rows, 1, TextStyle::Normal, BOX_BOTTOM)
                .await;
        }
        self.draw_ticks(term, rows).await;
        self.frame_drawn = true;
    }

    async fn draw_ticks(&mut self, term: &mut Vt100<'_>, rows: u16) {
        if rows == 0 {
            return;
        }
        let min = i32::from(self.frame_min);
        let max = i32::from(self.frame_max);
        let mut row = 0u16;
        while row < rows {
            let label = if rows > 1 {
                max - (max - min) * i32::from(row) / (i32::from(rows) - 1)
            } else {
                max
            };
            let mut text = heapless::String::<8>::new();
            let _ = write!(&mut text, "{label:<4}");
            term.print_at(FIRST_BODY_ROW + row, COL_TICK_LEFT, TextStyle::Normal, &text)
                .await;
            term.print_at(FIRST_BODY_ROW + row, COL_TICK_RIGHT, TextStyle::Normal, &text)
                .await;
            row += 2;
        }
    }

    /// Scrolling column chart: repaints only the one cell per column that
    /// actually moved, using the remembered row of the previous paint.
    pub(crate) async fn draw_sparkline(&mut self, term: &mut Vt100<'_>, history: &SignalHistory) {
        self.refresh_frame_if_needed(term, history).await;
        if !history.has_readings() || history.is_empty() {
            return;
        }

        let (average, lost_percent) = history.window_stats();
        let mut stats = heapless::String::<STATS_WIDTH>::new();
        let _ = write!(&mut stats, "avg: {average:<4} lost {lost_percent:>2}%");
        while stats.len() < STATS_WIDTH {
            let _ = stats.push(' ');
        }
        term.print_at(2, COL_STATS, TextStyle::Normal, &stats).await;

        let rows = body_rows(self.frame_min, self.frame_max);
        for (index, sample) in history.iter().enumerate() {
            let col = COL_DATA_BASE + index as u16;
            term.print_at(
                FIRST_BODY_ROW + self.previous_row[index],
                col,
                TextStyle::Normal,
                " ",
            )
            .await;
            let (row, glyph) = if sample == SAMPLE_LOST {
                (rows - 1, "X")
            } else {
                sparkline_cell(sample, self.frame_min, rows)
            };
            term.print_at(FIRST_BODY_ROW + row, col, TextStyle::Normal, glyph)
                .await;
            self.previous_row[index] = row;
        }
    }

    /// One full row per sample, raw value plus proportional bar; the whole
    /// region is rewritten every cycle.
    pub(crate) async fn draw_bars(&mut self, term: &mut Vt100<'_>, history: &SignalHistory) {
        if !history.has_readings() || history.is_empty() {
            return;
        }
        let min = history.min_dbm();
        let max = history.max_dbm();
        for (index, sample) in history.iter().enumerate() {
            let row = FIRST_BODY_ROW + index as u16;
            let mut value = heapless::String::<8>::new();
            let _ = write!(&mut value, "{sample:<4}");
            term.print_at(row, BAR_COL_VALUE, TextStyle::Normal, &value)
                .await;

            let filled = bar_len(sample, min, max);
            let mut bar = heapless::String::<208>::new();
            for _ in 0..filled {
                let _ = bar.push_str("█");
            }
            for _ in filled..BAR_WIDTH {
                let _ = bar.push(' ');
            }
            term.print_at(row, BAR_COL_START, TextStyle::Normal, &bar)
                .await;
        }
    }

    /// Plain-log fallback: the latest sample as one value-plus-bar line.
    pub(crate) async fn log_latest(&self, uart: &mut SerialUart, history: &SignalHistory) {
        if !history.has_readings() {
            return;
        }
        let Some(sample) = history.latest() else {
            return;
        };
        let mut line = heapless::String::<224>::new();
        let _ = write!(&mut line, "{sample} ");
        for _ in 0..bar_len(sample, history.min_dbm(), history.max_dbm()) {
            let _ = line.push_str("█");
        }
        let _ = line.push_str("\r\n");
        let _ = uart_write_all(uart, line.as_bytes()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_rows_is_half_span_rounded_up() {
        assert_eq!(body_rows(-90, -30), 31);
        assert_eq!(body_rows(-60, -59), 1);
        assert_eq!(body_rows(-60, -60), 1);
        // inverted bounds mean no data yet
        assert_eq!(body_rows(HISTORY_MIN_RESET_DBM, HISTORY_MAX_RESET_DBM), 0);
    }

    #[test]
    fn bar_len_maps_range_onto_column_budget() {
        assert_eq!(bar_len(-90, -90, -30), 1);
        assert_eq!(bar_len(-30, -90, -30), BAR_WIDTH);
        assert_eq!(bar_len(SAMPLE_LOST, -90, -30), 0);
    }

    #[test]
    fn degenerate_range_maps_to_midpoint() {
        assert_eq!(bar_len(-55, -55, -55), BAR_WIDTH / 2);
    }

    #[test]
    fn sparkline_extremes_hit_the_frame_edges() {
        let rows = body_rows(-90, -30);
        let (bottom, glyph) = sparkline_cell(-90, -90, rows);
        assert_eq!(bottom, rows - 1);
        assert_eq!(glyph, "▀");
        let (top, _) = sparkline_cell(-30, -90, rows);
        assert_eq!(top, 0);
    }

    #[test]
    fn sparkline_half_steps_alternate_glyphs() {
        let rows = body_rows(-90, -30);
        let (row_even, glyph_even) = sparkline_cell(-88, -90, rows);
        let (row_odd, glyph_odd) = sparkline_cell(-89, -90, rows);
        assert_eq!(glyph_even, "▀");
        assert_eq!(glyph_odd, "▄");
        // one half-step apart shares the row above the base
        assert_eq!(row_even, rows - 2);
        assert_eq!(row_odd, rows - 2);
    }

    #[test]
    fn even_span_top_folds_into_first_row() {
        let rows = body_rows(-60, -31); // span 30, even
        let (row, _) = sparkline_cell(-31, -60, rows);
        assert_eq!(row, 0);
    }
}
