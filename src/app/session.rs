use embassy_time::{with_timeout, Duration, Instant, Timer};
use esp_println::println;

use super::{
    history::{SignalHistory, SAMPLE_LOST},
    input::{self, InputEffect},
    render::{chart::ChartRenderer, dashboard::DashboardRenderer},
    scan::Radio,
    survey::SurveyStore,
    term::{self, Vt100},
    types::{ChartStyle, ChartTarget, SerialUart, SessionState, SessionView},
};

struct Session {
    state: SessionState,
    store: SurveyStore,
    history: SignalHistory,
    dashboard: DashboardRenderer,
    chart: ChartRenderer,
    boot: Instant,
}

/// The whole program is this one cooperative cycle: drain operator input,
/// survey or probe, render, sleep. Nothing here is allowed to halt it.
#[embassy_executor::task]
pub(crate) async fn session_task(mut uart: SerialUart, mut radio: Radio) {
    let mut session = Session {
        state: SessionState::new(),
        store: SurveyStore::new(),
        history: SignalHistory::new(),
        dashboard: DashboardRenderer::new(),
        chart: ChartRenderer::new(),
        boot: Instant::now(),
    };

    if let Err(err) = radio.start().await {
        // scans will come back empty; the loop still runs
        println!("airscope: {err}");
    }

    session.enable_terminal(&mut uart).await;

    loop {
        session.drain_input(&mut uart).await;

        let started = session.state.view();
        match &started {
            SessionView::Dashboard => {
                session.store.begin_epoch();
                let hits = radio.scan_all().await;
                session.drain_input(&mut uart).await;
                let now_ms = session.elapsed_ms();
                for hit in &hits {
                    session.store.merge(hit, now_ms);
                }
                if view_still_current(&started, &session.state.view()) {
                    session
                        .render_dashboard(&mut uart, hits.len(), now_ms)
                        .await;
                }
            }
            SessionView::Chart { target, .. } => {
                let sample = radio
                    .scan_one(&target.ssid, target.channel)
                    .await
                    .unwrap_or(SAMPLE_LOST);
                session.drain_input(&mut uart).await;
                let current = session.state.view();
                if view_still_current(&started, &current) {
                    if let SessionView::Chart { style, .. } = current {
                        session.history.push(sample);
                        session.render_chart(&mut uart, style).await;
                    }
                }
            }
        }

        Timer::after(Duration::from_millis(u64::from(session.state.poll_delay_ms))).await;
    }
}

/// A scan result belongs to the view it was taken for. The post-scan input
/// drain can replace that view and paint the new frame; rendering the stale
/// result afterwards would scribble over it, so such a cycle is dropped.
/// A style cycle on an unchanged chart target keeps the cycle current.
fn view_still_current(started: &SessionView, current: &SessionView) -> bool {
    match (started, current) {
        (SessionView::Dashboard, SessionView::Dashboard) => true,
        (SessionView::Chart { target: a, .. }, SessionView::Chart { target: b, .. }) => a == b,
        _ => false,
    }
}

impl Session {
    fn elapsed_ms(&self) -> u64 {
        Instant::now()
            .saturating_duration_since(self.boot)
            .as_millis()
    }

    async fn drain_input(&mut self, uart: &mut SerialUart) {
        let mut byte = [0u8; 1];
        loop {
            match with_timeout(Duration::from_millis(2), uart.read_async(&mut byte)).await {
                Ok(Ok(n)) if n > 0 => {
                    let effect = input::handle_byte(&mut self.state, self.store.len(), byte[0]);
                    self.apply_effect(uart, effect).await;
                }
                _ => break,
            }
        }
    }

    async fn apply_effect(&mut self, uart: &mut SerialUart, effect: InputEffect) {
        match effect {
            InputEffect::None => {}
            InputEffect::SelectTarget(index) => {
                let Some(record) = self.store.record(index - 1) else {
                    return;
                };
                let target = ChartTarget {
                    ssid: record.ssid.clone(),
                    channel: record.channel,
                };
                self.state.selection = Some(target.clone());
                self.history.clear();
                if self.state.term_enabled {
                    let mut term = Vt100::new(uart);
                    self.chart
                        .draw_frame(&mut term, &target.ssid, &self.history)
                        .await;
                } else {
                    println!("selected {}", target.ssid);
                }
            }
            InputEffect::Deselect => {
                self.state.selection = None;
                if self.state.term_enabled {
                    let mut term = Vt100::new(uart);
                    self.dashboard.draw_frame(&mut term, self.store.len()).await;
                }
            }
            InputEffect::ToggleTerminal => {
                if self.state.term_enabled {
                    let mut term = Vt100::new(uart);
                    term.leave().await;
                    self.state.term_enabled = false;
                } else {
                    self.enable_terminal(uart).await;
                }
            }
            InputEffect::CycleView => {
                // the two chart styles lay the region out differently
                if self.state.term_enabled && self.state.selection.is_some() {
                    if let SessionView::Chart { target, .. } = self.state.view() {
                        let mut term = Vt100::new(uart);
                        self.chart
                            .draw_frame(&mut term, &target.ssid, &self.history)
                            .await;
                    }
                }
            }
            InputEffect::ResetSurvey => {
                self.store.reset();
                if self.state.term_enabled && self.state.selection.is_none() {
                    let mut term = Vt100::new(uart);
                    self.dashboard.draw_frame(&mut term, 0).await;
                }
            }
        }
    }

    /// Probes the attached terminal once; a negative reply leaves escape
    /// rendering off until the operator retries with `/`.
    async fn enable_terminal(&mut self, uart: &mut SerialUart) {
        match term::probe_terminal(uart).await {
            Some(class) if class >= 1 => {
                let mut term = Vt100::new(uart);
                term.enter().await;
                self.state.term_enabled = true;
                match self.state.view() {
                    SessionView::Dashboard => {
                        self.dashboard.draw_frame(&mut term, self.store.len()).await;
                    }
                    SessionView::Chart { target, .. } => {
                        self.chart
                            .draw_frame(&mut term, &target.ssid, &self.history)
                            .await;
                    }
                }
            }
            _ => {
                self.state.term_enabled = false;
                println!("terminal: unknown type; escape rendering disabled");
            }
        }
    }

    async fn render_dashboard(&mut self, uart: &mut SerialUart, found: usize, now_ms: u64) {
        let uptime_seconds = now_ms / 1_000;
        if self.state.term_enabled {
            let mut term = Vt100::new(uart);
            self.dashboard
                .draw(
                    &mut term,
                    &mut self.store,
                    self.state.view_mode,
                    found,
                    uptime_seconds,
                    now_ms,
                )
                .await;
        } else {
            self.dashboard
                .log(
                    uart,
                    &mut self.store,
                    self.state.view_mode,
                    found,
                    uptime_seconds,
                    now_ms,
                )
                .await;
        }
    }

    async fn render_chart(&mut self, uart: &mut SerialUart, style: ChartStyle) {
        if self.state.term_enabled {
            let mut term = Vt100::new(uart);
            match style {
                ChartStyle::Sparkline => {
                    self.chart.draw_sparkline(&mut term, &self.history).await;
                }
                ChartStyle::BarRows => {
                    self.chart.draw_bars(&mut term, &self.history).await;
                }
            }
        } else {
            self.chart.log_latest(uart, &self.history).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::view_still_current;
    use crate::app::types::{ChartTarget, SessionState};

    fn target(ssid: &str) -> ChartTarget {
        ChartTarget {
            ssid: ssid.try_into().unwrap(),
            channel: 6,
        }
    }

    #[test]
    fn unchanged_dashboard_view_stays_current() {
        let state = SessionState::new();
        assert!(view_still_current(&state.view(), &state.view()));
    }

    #[test]
    fn selection_landing_during_the_scan_drops_the_table_render() {
        let mut state = SessionState::new();
        let started = state.view();
        // operator picked a network while the survey was in flight; the
        // chart frame is already painted
        state.selection = Some(target("net"));
        assert!(!view_still_current(&started, &state.view()));
    }

    #[test]
    fn deselect_during_the_probe_drops_the_chart_render() {
        let mut state = SessionState::new();
        state.selection = Some(target("net"));
        let started = state.view();
        state.selection = None;
        assert!(!view_still_current(&started, &state.view()));
    }

    #[test]
    fn retarget_during_the_probe_discards_the_old_sample() {
        let mut state = SessionState::new();
        state.selection = Some(target("alpha"));
        let started = state.view();
        state.selection = Some(target("bravo"));
        assert!(!view_still_current(&started, &state.view()));
    }

    #[test]
    fn style_cycle_on_the_same_target_stays_current() {
        let mut state = SessionState::new();
        state.selection = Some(target("net"));
        let started = state.view();
        state.view_mode = state.view_mode.cycled();
        assert!(view_still_current(&started, &state.view()));
    }
}
