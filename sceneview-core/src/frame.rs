//! The fixed-interval frame scheduler.
//!
//! One tick: measure the frame delta, apply every held key to the camera,
//! advance the scene, then hand camera and scene to the draw pass. Nothing
//! else in the viewer advances simulation time.

use std::time::Duration;

use glam::Mat4;

use crate::{
    camera::Camera,
    clock::{Clock, FrameClock},
    input::InputState,
    scene::{Material, Scene},
};

/// All mutable viewer state, owned in one place and passed to the scheduler.
#[derive(Debug)]
pub struct ViewerState<R> {
    pub camera: Camera,
    pub input: InputState,
    pub scene: Scene<R>,
}

impl<R> ViewerState<R> {
    pub fn new(camera: Camera, scene: Scene<R>) -> Self {
        Self {
            camera,
            input: InputState::new(),
            scene,
        }
    }
}

/// Draws a frame from the current camera and scene.
pub trait DrawPass<R> {
    fn draw(&mut self, camera: &Camera, scene: &Scene<R>);
}

/// Per-object state a draw pass uploads before issuing the draw call.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a, R> {
    pub index: usize,
    pub model_view: Mat4,
    pub material: &'a Material,
    pub resources: &'a R,
}

/// Yields one [`DrawCall`] per object in index order.
pub fn draw_calls<'a, R>(
    camera: &Camera,
    scene: &'a Scene<R>,
) -> impl Iterator<Item = DrawCall<'a, R>> + 'a {
    let view = camera.view_matrix();
    scene
        .objects()
        .iter()
        .enumerate()
        .map(move |(index, object)| DrawCall {
            index,
            model_view: view * object.model(),
            material: object.material(),
            resources: object.resources(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Rendering,
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub tick: u64,
    pub delta_ms: f32,
    pub objects: usize,
}

pub struct FrameScheduler<C: Clock> {
    clock: C,
    frames: FrameClock,
    interval: Duration,
    next_tick: Duration,
    state: SchedulerState,
    ticks: u64,
}

impl<C: Clock> FrameScheduler<C> {
    /// Creates a scheduler whose first tick is due one interval from now.
    /// The first frame delta is measured from here, not from the clock epoch.
    pub fn new(clock: C, interval: Duration) -> Self {
        let now = clock.now();
        Self {
            clock,
            frames: FrameClock::starting_at(now),
            interval,
            next_tick: now + interval,
            state: SchedulerState::Idle,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the next tick is due.
    pub fn is_due(&self) -> bool {
        self.clock.now() >= self.next_tick
    }

    /// Time left until the next tick is due.
    pub fn until_next_tick(&self) -> Duration {
        self.next_tick.saturating_sub(self.clock.now())
    }

    /// Runs one frame and schedules the next one an interval later.
    pub fn tick<R, P: DrawPass<R>>(
        &mut self,
        viewer: &mut ViewerState<R>,
        pass: &mut P,
    ) -> FrameStats {
        self.state = SchedulerState::Rendering;

        let now = self.clock.now();
        let delta_ms = self.frames.tick(now);

        for action in viewer.input.held_actions() {
            viewer.camera.apply(action, delta_ms);
        }
        viewer.scene.advance(delta_ms);
        pass.draw(&viewer.camera, &viewer.scene);

        self.next_tick = now + self.interval;
        self.ticks += 1;
        self.state = SchedulerState::Idle;

        log::trace!("tick {} took {:.3} ms", self.ticks, delta_ms);

        FrameStats {
            tick: self.ticks,
            delta_ms,
            objects: viewer.scene.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use glam::Vec3;

    use super::*;
    use crate::{
        clock::ManualClock,
        input::Key,
        layout::SceneLayout,
    };

    #[derive(Default)]
    struct RecordingPass {
        frames: Vec<Vec<(usize, Mat4)>>,
    }

    impl<R> DrawPass<R> for RecordingPass {
        fn draw(&mut self, camera: &Camera, scene: &Scene<R>) {
            self.frames.push(
                draw_calls(camera, scene)
                    .map(|call| (call.index, call.model_view))
                    .collect(),
            );
        }
    }

    fn viewer() -> ViewerState<()> {
        let layout = SceneLayout::builtin("assets").unwrap();
        ViewerState::new(
            layout.camera.into(),
            Scene::without_resources(&layout),
        )
    }

    #[test]
    fn first_tick_is_due_after_one_interval() {
        let clock = ManualClock::new();
        let scheduler = FrameScheduler::new(&clock, Duration::from_millis(16));
        assert!(!scheduler.is_due());
        assert_eq!(scheduler.until_next_tick(), Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert!(scheduler.is_due());
        assert_eq!(scheduler.until_next_tick(), Duration::ZERO);
    }

    #[test]
    fn startup_time_is_not_part_of_the_first_delta() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(500));
        let mut scheduler = FrameScheduler::new(&clock, Duration::from_millis(1));
        let mut viewer = viewer();
        let mut pass = RecordingPass::default();
        let drifter = viewer.scene.objects()[4].initial();

        clock.advance(Duration::from_millis(1));
        let stats = scheduler.tick(&mut viewer, &mut pass);
        assert_eq!(stats.delta_ms, 1.0);
        let expected = drifter * Mat4::from_translation(Vec3::new(0.0, 0.0, -0.01));
        assert!(viewer.scene.objects()[4].model().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn tick_reschedules_and_returns_to_idle() {
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(&clock, Duration::from_millis(10));
        let mut viewer = viewer();
        let mut pass = RecordingPass::default();

        clock.advance(Duration::from_millis(12));
        let stats = scheduler.tick(&mut viewer, &mut pass);
        assert_eq!(stats.tick, 1);
        assert_eq!(stats.delta_ms, 12.0);
        assert_eq!(stats.objects, 5);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.until_next_tick(), Duration::from_millis(10));
        assert_eq!(pass.frames.len(), 1);
    }

    #[test]
    fn held_key_applies_once_per_tick() {
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(&clock, Duration::from_millis(20));
        let mut viewer = viewer();
        let mut pass = RecordingPass::default();
        let start = viewer.camera.position();
        let direction = viewer.camera.direction();

        assert_eq!(viewer.input.set_key(Key::W, true), ControlFlow::Continue(()));
        for _ in 0..5 {
            clock.advance(Duration::from_millis(20));
            scheduler.tick(&mut viewer, &mut pass);
        }
        assert!(viewer.camera.position().abs_diff_eq(start + direction * 5.0, 1e-4));

        // Released keys stop applying.
        let _ = viewer.input.set_key(Key::W, false);
        let stopped = viewer.camera.position();
        clock.advance(Duration::from_millis(20));
        scheduler.tick(&mut viewer, &mut pass);
        assert_eq!(viewer.camera.position(), stopped);
    }

    #[test]
    fn held_turn_key_rotates_every_tick() {
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(&clock, Duration::from_millis(10));
        let mut viewer = viewer();
        let mut pass = RecordingPass::default();
        let yaw = viewer.camera.yaw();

        let _ = viewer.input.set_key(Key::L, true);
        for _ in 0..3 {
            clock.advance(Duration::from_millis(10));
            scheduler.tick(&mut viewer, &mut pass);
        }
        // 0.1 degrees per millisecond over 30 ms.
        assert!((viewer.camera.yaw() - (yaw + 3.0)).abs() < 1e-4);
    }

    #[test]
    fn draw_pass_sees_objects_in_index_order() {
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(&clock, Duration::from_millis(1));
        let mut viewer = viewer();
        let mut pass = RecordingPass::default();

        clock.advance(Duration::from_millis(1));
        scheduler.tick(&mut viewer, &mut pass);

        let view = viewer.camera.view_matrix();
        let frame = &pass.frames[0];
        assert_eq!(frame.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        for ((_, model_view), object) in frame.iter().zip(viewer.scene.objects()) {
            assert!(model_view.abs_diff_eq(view * object.model(), 1e-6));
        }
    }

    #[test]
    fn scene_advances_with_measured_delta() {
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(&clock, Duration::from_millis(1));
        let mut viewer = viewer();
        let mut pass = RecordingPass::default();

        for _ in 0..100 {
            clock.advance(Duration::from_millis(1));
            scheduler.tick(&mut viewer, &mut pass);
        }
        let drifter = &viewer.scene.objects()[4];
        let expected = drifter.initial() * Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0));
        assert!(drifter.model().abs_diff_eq(expected, 1e-4));
        assert_eq!(scheduler.ticks(), 100);
    }

    #[test]
    fn identical_clocks_give_identical_runs() {
        let run = || {
            let clock = ManualClock::new();
            let mut scheduler = FrameScheduler::new(&clock, Duration::from_millis(5));
            let mut viewer = viewer();
            let mut pass = RecordingPass::default();
            let _ = viewer.input.set_key(Key::D, true);
            let _ = viewer.input.set_key(Key::I, true);
            for step in [3, 7, 5, 11, 2] {
                clock.advance(Duration::from_millis(step));
                scheduler.tick(&mut viewer, &mut pass);
            }
            (viewer.camera, pass.frames)
        };
        let (camera_a, frames_a) = run();
        let (camera_b, frames_b) = run();
        assert_eq!(camera_a, camera_b);
        assert_eq!(frames_a, frames_b);
    }
}
