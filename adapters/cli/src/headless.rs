//! Rendering backend that draws nothing and replays scripted input.

use std::{collections::VecDeque, time::Duration};

use anyhow::Result;
use showhouse_core::ShowState;
use showhouse_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

/// Runs frames at a fixed cadence until the show returns to idle or the frame budget runs out.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frame: Duration,
    max_frames: u64,
    script: VecDeque<FrameInput>,
}

impl HeadlessBackend {
    pub(crate) fn new(frame: Duration, max_frames: u64, script: Vec<FrameInput>) -> Self {
        Self {
            frame,
            max_frames,
            script: script.into(),
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let mut scene = presentation.scene;
        let mut show_started = false;

        for _ in 0..self.max_frames {
            let scripted = !self.script.is_empty();
            let input = self.script.pop_front().unwrap_or_default();
            let dt = if scripted { Duration::ZERO } else { self.frame };
            update_scene(dt, input, &mut scene);

            show_started |= scene.show_state != ShowState::Waiting;
            if show_started && self.script.is_empty() && scene.show_state == ShowState::Waiting {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use showhouse_core::Lighting;
    use showhouse_rendering::DoorPresentation;

    fn idle_scene() -> Scene {
        Scene {
            seats: Vec::new(),
            patrons: Vec::new(),
            door: DoorPresentation {
                position: glam::Vec3::ZERO,
                open: 0.0,
            },
            lighting: Lighting::On,
            screen_frame: 0,
            show_state: ShowState::Waiting,
        }
    }

    #[test]
    fn stops_after_the_frame_budget() {
        let frames = Rc::new(Cell::new(0));
        let counter = Rc::clone(&frames);
        let backend = HeadlessBackend::new(Duration::from_millis(16), 12, Vec::new());
        backend
            .run(Presentation::new("test", idle_scene()), move |_, _, _| {
                counter.set(counter.get() + 1);
            })
            .expect("run");
        assert_eq!(frames.get(), 12);
    }

    #[test]
    fn scripted_frames_carry_no_time_and_come_first() {
        let seen = Rc::new(Cell::new((0_u32, Duration::ZERO)));
        let sink = Rc::clone(&seen);
        let script = vec![FrameInput {
            start_show: true,
            ..FrameInput::default()
        }];
        let backend = HeadlessBackend::new(Duration::from_millis(16), 3, script);
        backend
            .run(
                Presentation::new("test", idle_scene()),
                move |dt, input, _| {
                    let (starts, total) = sink.get();
                    sink.set((starts + u32::from(input.start_show), total + dt));
                },
            )
            .expect("run");
        assert_eq!(seen.get(), (1, Duration::from_millis(32)));
    }

    #[test]
    fn returning_to_idle_ends_the_run() {
        let frames = Rc::new(Cell::new(0));
        let counter = Rc::clone(&frames);
        let backend = HeadlessBackend::new(Duration::from_millis(16), 100, Vec::new());
        backend
            .run(
                Presentation::new("test", idle_scene()),
                move |_, _, scene| {
                    counter.set(counter.get() + 1);
                    scene.show_state = if counter.get() < 5 {
                        ShowState::Movie
                    } else {
                        ShowState::Waiting
                    };
                },
            )
            .expect("run");
        assert_eq!(frames.get(), 5);
    }
}
