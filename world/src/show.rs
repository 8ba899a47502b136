//! Show clock: lifecycle state, door easing, lighting and projected frame.

use std::time::Duration;

use showhouse_core::{Lighting, ShowClockView, ShowState, ShowTiming};

#[derive(Clone, Debug)]
pub(crate) struct ShowClock {
    state: ShowState,
    elapsed_in_state: Duration,
    door_open: f32,
    lighting: Lighting,
    screen_frame: u32,
    frame_timer: Duration,
}

impl ShowClock {
    pub(crate) fn new() -> Self {
        Self {
            state: ShowState::Waiting,
            elapsed_in_state: Duration::ZERO,
            door_open: 0.0,
            lighting: ShowState::Waiting.lighting(),
            screen_frame: 0,
            frame_timer: Duration::ZERO,
        }
    }

    pub(crate) const fn state(&self) -> ShowState {
        self.state
    }

    pub(crate) const fn elapsed_in_state(&self) -> Duration {
        self.elapsed_in_state
    }

    /// Advances every timer by `dt` and eases the door toward the state's target.
    pub(crate) fn advance(&mut self, dt: Duration, timing: &ShowTiming) {
        self.elapsed_in_state = self.elapsed_in_state.saturating_add(dt);

        let target = self.state.door_target();
        let step = (timing.door_speed * dt.as_secs_f32()).max(0.0);
        self.door_open = if self.door_open < target {
            (self.door_open + step).min(target)
        } else {
            (self.door_open - step).max(target)
        }
        .clamp(0.0, 1.0);

        if self.state == ShowState::Movie {
            self.advance_screen(dt, timing);
        }
    }

    fn advance_screen(&mut self, dt: Duration, timing: &ShowTiming) {
        let period = timing.frame_period();
        if period.is_zero() || timing.frame_count == 0 {
            return;
        }

        self.frame_timer = self.frame_timer.saturating_add(dt);
        while self.frame_timer >= period {
            self.frame_timer -= period;
            self.screen_frame = (self.screen_frame + 1) % timing.frame_count;
        }
    }

    /// Enters `next`, restarting the per-state timers.
    pub(crate) fn enter(&mut self, next: ShowState) {
        self.state = next;
        self.elapsed_in_state = Duration::ZERO;
        if next == ShowState::Movie {
            self.screen_frame = 0;
            self.frame_timer = Duration::ZERO;
        }
    }

    /// Switches the lighting, reporting whether it changed.
    pub(crate) fn set_lighting(&mut self, lighting: Lighting) -> bool {
        let changed = self.lighting != lighting;
        self.lighting = lighting;
        changed
    }

    pub(crate) fn view(&self) -> ShowClockView {
        ShowClockView {
            state: self.state,
            elapsed_in_state: self.elapsed_in_state,
            door_open: self.door_open,
            lighting: self.lighting,
            screen_frame: self.screen_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_opens_at_fixed_rate_and_saturates() {
        let timing = ShowTiming::default();
        let mut clock = ShowClock::new();
        clock.enter(ShowState::Entering);

        clock.advance(Duration::from_millis(200), &timing);
        assert!((clock.view().door_open - 0.3).abs() < 1e-4);

        clock.advance(Duration::from_secs(5), &timing);
        assert!((clock.view().door_open - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn door_closes_while_waiting() {
        let timing = ShowTiming::default();
        let mut clock = ShowClock::new();
        clock.enter(ShowState::Leaving);
        clock.advance(Duration::from_secs(1), &timing);
        clock.enter(ShowState::Waiting);
        clock.advance(Duration::from_secs(10), &timing);
        assert!(clock.view().door_open.abs() < f32::EPSILON);
    }

    #[test]
    fn door_stays_in_unit_range_for_any_tick_size() {
        let timing = ShowTiming::default();
        let mut clock = ShowClock::new();
        let states = [
            ShowState::Entering,
            ShowState::Movie,
            ShowState::Leaving,
            ShowState::Waiting,
        ];
        let ticks = [
            Duration::from_micros(1),
            Duration::from_millis(13),
            Duration::from_secs(3),
            Duration::from_secs(3600),
        ];
        for (step, state) in states.iter().cycle().take(64).enumerate() {
            clock.enter(*state);
            for dt in ticks.iter().skip(step % ticks.len()) {
                clock.advance(*dt, &timing);
                let door = clock.view().door_open;
                assert!((0.0..=1.0).contains(&door), "door {door} left unit range");
            }
        }
    }

    #[test]
    fn screen_frames_advance_only_during_movie() {
        let timing = ShowTiming::default();
        let mut clock = ShowClock::new();
        clock.advance(Duration::from_secs(2), &timing);
        assert_eq!(clock.view().screen_frame, 0);

        clock.enter(ShowState::Movie);
        clock.advance(Duration::from_millis(1_250), &timing);
        assert_eq!(clock.view().screen_frame, 2);

        clock.advance(Duration::from_secs(12), &timing);
        assert_eq!(clock.view().screen_frame, 1);
    }

    #[test]
    fn entering_a_state_restarts_elapsed_time() {
        let timing = ShowTiming::default();
        let mut clock = ShowClock::new();
        clock.advance(Duration::from_secs(3), &timing);
        assert_eq!(clock.elapsed_in_state(), Duration::from_secs(3));
        clock.enter(ShowState::Entering);
        assert_eq!(clock.elapsed_in_state(), Duration::ZERO);
        assert!(clock.set_lighting(Lighting::Off));
        assert!(!clock.set_lighting(Lighting::Off));
    }
}
