use super::{
    config::{POLL_DELAY_MIN_MS, POLL_DELAY_STEP_MS},
    types::SessionState,
};

/// Follow-up the session loop must perform after a byte was interpreted.
/// Pure state mutations (delay, view mode, digit buffer) happen in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEffect {
    None,
    /// 1-based index into the currently displayed ranking.
    SelectTarget(usize),
    Deselect,
    ToggleTerminal,
    CycleView,
    ResetSurvey,
}

pub(crate) fn handle_byte(state: &mut SessionState, record_count: usize, byte: u8) -> InputEffect {
    match byte {
        b'0'..=b'9' => {
            if state.pending.push(byte as char).is_err() {
                // way past any plausible record index; treat as abandoned
                state.pending.clear();
            }
            InputEffect::None
        }
        b'\r' => {
            let selection = parse_selection(state.pending.as_str(), record_count);
            state.pending.clear();
            match selection {
                Some(index) => InputEffect::SelectTarget(index),
                None => InputEffect::Deselect,
            }
        }
        0x1b => {
            state.pending.clear();
            InputEffect::Deselect
        }
        b'-' => {
            state.pending.clear();
            state.poll_delay_ms = state.poll_delay_ms.saturating_add(POLL_DELAY_STEP_MS);
            InputEffect::None
        }
        b'+' => {
            state.pending.clear();
            state.poll_delay_ms = state
                .poll_delay_ms
                .saturating_sub(POLL_DELAY_STEP_MS)
                .max(POLL_DELAY_MIN_MS);
            InputEffect::None
        }
        b'/' => InputEffect::ToggleTerminal,
        b'*' => {
            state.view_mode = state.view_mode.cycled();
            InputEffect::CycleView
        }
        b'r' => InputEffect::ResetSurvey,
        _ => {
            state.pending.clear();
            InputEffect::None
        }
    }
}

fn parse_selection(pending: &str, record_count: usize) -> Option<usize> {
    if pending.is_empty() {
        return None;
    }
    let index: usize = pending.parse().ok()?;
    if index >= 1 && index <= record_count {
        Some(index)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::POLL_DELAY_DEFAULT_MS;

    fn feed(state: &mut SessionState, record_count: usize, bytes: &[u8]) -> InputEffect {
        let mut last = InputEffect::None;
        for &byte in bytes {
            last = handle_byte(state, record_count, byte);
        }
        last
    }

    #[test]
    fn digits_then_return_select_in_range() {
        let mut state = SessionState::new();
        assert_eq!(feed(&mut state, 12, b"12\r"), InputEffect::SelectTarget(12));
        assert!(state.pending.is_empty());
    }

    #[test]
    fn out_of_range_selection_falls_back_to_dashboard() {
        let mut state = SessionState::new();
        assert_eq!(feed(&mut state, 3, b"4\r"), InputEffect::Deselect);
        assert_eq!(feed(&mut state, 3, b"0\r"), InputEffect::Deselect);
        assert_eq!(feed(&mut state, 3, b"\r"), InputEffect::Deselect);
    }

    #[test]
    fn escape_clears_pending_and_selection() {
        let mut state = SessionState::new();
        let _ = feed(&mut state, 9, b"42");
        assert_eq!(handle_byte(&mut state, 9, 0x1b), InputEffect::Deselect);
        assert!(state.pending.is_empty());
    }

    #[test]
    fn stray_byte_abandons_pending_command() {
        let mut state = SessionState::new();
        let _ = feed(&mut state, 9, b"7x");
        assert!(state.pending.is_empty());
        assert_eq!(feed(&mut state, 9, b"\r"), InputEffect::Deselect);
    }

    #[test]
    fn delay_adjustments_clamp_at_floor() {
        let mut state = SessionState::new();
        let _ = handle_byte(&mut state, 0, b'-');
        assert_eq!(
            state.poll_delay_ms,
            POLL_DELAY_DEFAULT_MS + POLL_DELAY_STEP_MS
        );
        for _ in 0..100 {
            let _ = handle_byte(&mut state, 0, b'+');
        }
        assert_eq!(state.poll_delay_ms, POLL_DELAY_MIN_MS);
    }

    #[test]
    fn delay_increase_saturates_at_the_ceiling() {
        let mut state = SessionState::new();
        state.poll_delay_ms = u32::MAX - POLL_DELAY_STEP_MS / 2;
        let _ = handle_byte(&mut state, 0, b'-');
        assert_eq!(state.poll_delay_ms, u32::MAX);
    }

    #[test]
    fn star_cycles_view_mode() {
        let mut state = SessionState::new();
        let before = state.view_mode;
        assert_eq!(handle_byte(&mut state, 0, b'*'), InputEffect::CycleView);
        assert_ne!(state.view_mode, before);
        let _ = handle_byte(&mut state, 0, b'*');
        assert_eq!(state.view_mode, before);
    }
}
