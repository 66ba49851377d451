//! Playback controller - owns the playback state of one model instance and
//! realizes it once per frame

use crate::capability::AnimatedModel;
use crate::catalog::{Clip, ClipCatalog};
use crate::clock::{ClockReading, PlaybackClock};
use crate::command::{ControlHandle, PlaybackCommand};
use crate::notifier::{LogNotifier, PlaybackNotice, PlaybackNotifier};
use crate::speed::SpeedMultiplier;
use crate::state::PlaybackState;
use crossbeam_channel::Receiver;
use hoist_core::{HoistError, Result};
use hoist_runtime::{MonotonicClock, RuntimeSystem, TimeSource};
use log::{debug, info, warn};
use std::time::Instant;

/// Playback settings applied when a model is attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackDefaults {
    pub clip: usize,
    pub looping: bool,
    pub speed: SpeedMultiplier,
}

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            clip: 0,
            looping: false,
            speed: SpeedMultiplier::NORMAL,
        }
    }
}

/// Everything that only exists once a model has loaded
struct Attached<M> {
    model: M,
    catalog: ClipCatalog,
    state: PlaybackState,
    /// Whether the current one-shot clip was already reported as finished
    finish_reported: bool,
}

/// Drives one model: clip selection, speed changes and the per-frame
/// clock → pose → render sequence.
///
/// Before [`attach`](Self::attach) every playback operation fails with
/// `NotReady`.
pub struct PlaybackController<M: AnimatedModel, N: PlaybackNotifier = LogNotifier> {
    attached: Option<Attached<M>>,
    notifier: N,
    clock: Box<dyn TimeSource>,
    commands: Option<Receiver<PlaybackCommand>>,
}

impl<M: AnimatedModel> PlaybackController<M> {
    /// Controller that logs its notices
    pub fn new() -> Self {
        Self::with_notifier(LogNotifier)
    }
}

impl<M: AnimatedModel> Default for PlaybackController<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: AnimatedModel, N: PlaybackNotifier> PlaybackController<M, N> {
    /// Controller reporting its notices to `notifier`, timed by the monotonic clock
    pub fn with_notifier(notifier: N) -> Self {
        Self {
            attached: None,
            notifier,
            clock: Box::new(MonotonicClock::new()),
            commands: None,
        }
    }

    /// Replace the time source used to timestamp selections and speed changes
    pub fn with_clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Attach a loaded model and start playing the default clip
    pub fn attach(&mut self, model: M, defaults: PlaybackDefaults) -> Result<()> {
        let now = self.clock.now();
        self.attach_at(model, defaults, now)
    }

    /// Like [`attach`](Self::attach) with an explicit start timestamp.
    /// Fails with `InvalidClipIndex` when the default clip does not exist.
    pub fn attach_at(&mut self, model: M, defaults: PlaybackDefaults, now: Instant) -> Result<()> {
        let catalog = ClipCatalog::from_model(&model)?;
        if catalog.is_empty() {
            warn!("Model has no animation clips; frames will render the bind pose");
        } else {
            catalog.get(defaults.clip)?;
        }

        self.attached = Some(Attached {
            model,
            catalog,
            state: PlaybackState::new(defaults.clip, defaults.looping, defaults.speed, now),
            finish_reported: false,
        });
        Ok(())
    }

    /// Release the model. The controller is not ready afterwards.
    pub fn detach(&mut self) -> Option<M> {
        self.attached.take().map(|a| a.model)
    }

    /// Whether a model is attached
    pub fn is_ready(&self) -> bool {
        self.attached.is_some()
    }

    pub fn catalog(&self) -> Result<&ClipCatalog> {
        self.attached.as_ref().map(|a| &a.catalog).ok_or(HoistError::NotReady)
    }

    pub fn state(&self) -> Result<&PlaybackState> {
        self.attached.as_ref().map(|a| &a.state).ok_or(HoistError::NotReady)
    }

    pub fn model(&self) -> Option<&M> {
        self.attached.as_ref().map(|a| &a.model)
    }

    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.attached.as_mut().map(|a| &mut a.model)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Create the UI-side command handle. Any earlier handle is disconnected.
    pub fn control_handle(&mut self) -> ControlHandle {
        let (handle, rx) = ControlHandle::channel();
        self.commands = Some(rx);
        handle
    }

    /// Play a clip from its beginning and report it to the notifier
    pub fn select_clip(&mut self, index: usize, looping: bool) -> Result<()> {
        let now = self.clock.now();
        self.select_clip_at(index, looping, now)
    }

    /// Like [`select_clip`](Self::select_clip) with an explicit timestamp.
    /// An unknown index leaves the current playback untouched.
    pub fn select_clip_at(&mut self, index: usize, looping: bool, now: Instant) -> Result<()> {
        let attached = self.attached.as_mut().ok_or(HoistError::NotReady)?;
        let clip = attached.catalog.get(index)?;
        let notice = PlaybackNotice::for_clip(clip);

        attached.state.restart(index, looping, now);
        attached.finish_reported = false;
        info!(
            "Selected clip {} '{}' ({}, {})",
            index,
            clip.name,
            if looping { "looping" } else { "once" },
            attached.state.speed
        );

        self.notifier.notify(notice);
        Ok(())
    }

    /// Current speed multiplier
    pub fn speed(&self) -> Result<SpeedMultiplier> {
        self.state().map(|s| s.speed)
    }

    /// Double the speed, keeping the current clip position
    pub fn increase_speed(&mut self) -> Result<SpeedMultiplier> {
        let now = self.clock.now();
        self.increase_speed_at(now)
    }

    /// Like [`increase_speed`](Self::increase_speed) at the given timestamp.
    /// At the multiplier limit the speed stays as it is.
    pub fn increase_speed_at(&mut self, now: Instant) -> Result<SpeedMultiplier> {
        let state = &mut self.attached.as_mut().ok_or(HoistError::NotReady)?.state;
        match state.speed.doubled() {
            Some(faster) => {
                if state.set_speed(faster, now) {
                    debug!("Playback speed raised to {}", faster);
                }
            }
            None => warn!("Playback speed {} is already at its limit", state.speed),
        }
        Ok(state.speed)
    }

    /// Halve the speed (never below 1x), keeping the current clip position
    pub fn decrease_speed(&mut self) -> Result<SpeedMultiplier> {
        let now = self.clock.now();
        self.decrease_speed_at(now)
    }

    /// Like [`decrease_speed`](Self::decrease_speed) at the given timestamp
    pub fn decrease_speed_at(&mut self, now: Instant) -> Result<SpeedMultiplier> {
        let state = &mut self.attached.as_mut().ok_or(HoistError::NotReady)?.state;
        let slower = state.speed.halved();
        if state.set_speed(slower, now) {
            debug!("Playback speed lowered to {}", slower);
        }
        Ok(state.speed)
    }

    /// Read the playback clock without touching the model
    pub fn read_clock(&self, now: Instant) -> Result<ClockReading> {
        let attached = self.attached.as_ref().ok_or(HoistError::NotReady)?;
        Ok(read(attached, now))
    }

    /// One frame: apply queued commands, read the clock, pose the model,
    /// update its bones and render, all at the frame timestamp `now`.
    pub fn tick(&mut self, now: Instant) -> Result<ClockReading> {
        if self.attached.is_none() {
            return Err(HoistError::NotReady);
        }
        self.drain_commands(now);

        let attached = self.attached.as_mut().ok_or(HoistError::NotReady)?;
        let reading = read(attached, now);

        if !attached.catalog.is_empty() {
            let index = attached.state.clip;
            attached.model.apply_pose(index, reading.in_clip_time as f32)?;

            if reading.pinned && !attached.finish_reported {
                attached.finish_reported = true;
                if let Ok(clip) = attached.catalog.get(index) {
                    debug!("Clip '{}' is holding its final frame", clip.name);
                }
            }
        }
        attached.model.update_bone_matrices();
        attached.model.render(now)?;

        Ok(reading)
    }

    fn drain_commands(&mut self, now: Instant) {
        let pending: Vec<PlaybackCommand> = match &self.commands {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };
        for command in pending {
            let result = match command {
                PlaybackCommand::SelectClip { index, looping } => {
                    self.select_clip_at(index, looping, now)
                }
                PlaybackCommand::IncreaseSpeed => self.increase_speed_at(now).map(|_| ()),
                PlaybackCommand::DecreaseSpeed => self.decrease_speed_at(now).map(|_| ()),
            };
            if let Err(e) = result {
                warn!("Dropping playback command {:?}: {}", command, e);
            }
        }
    }
}

fn read<M>(attached: &Attached<M>, now: Instant) -> ClockReading {
    match attached.catalog.get(attached.state.clip) {
        Ok(clip) => PlaybackClock::read(&attached.state, clip, now),
        // Only an empty catalog gets here; hold the bind pose
        Err(_) => PlaybackClock::read(&attached.state, &Clip::new(attached.state.clip, "", 0.0), now),
    }
}

impl<M: AnimatedModel, N: PlaybackNotifier> RuntimeSystem for PlaybackController<M, N> {
    fn update(&mut self, now: Instant) -> Result<()> {
        self.tick(now).map(|_| ())
    }

    fn name(&self) -> &str {
        "playback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::NoticeQueue;
    use hoist_runtime::{FrameScheduler, HostDriver, ManualClock};
    use std::time::Duration;

    const EPS: f32 = 1e-5;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Pose(usize, f32),
        Bones,
        Render(Instant),
    }

    struct FakeModel {
        clips: Vec<(&'static str, f32)>,
        calls: Vec<Call>,
        reject_poses: bool,
    }

    impl FakeModel {
        fn lift() -> Self {
            Self {
                clips: vec![("down", 0.0), ("idle-final", 1.0), ("idle-mid", 1.5), ("up", 2.0)],
                calls: Vec::new(),
                reject_poses: false,
            }
        }

        fn poses(&self) -> Vec<(usize, f32)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Pose(i, t) => Some((*i, *t)),
                    _ => None,
                })
                .collect()
        }
    }

    impl AnimatedModel for FakeModel {
        fn clip_count(&self) -> usize {
            self.clips.len()
        }

        fn clip_duration(&self, index: usize) -> Result<f32> {
            self.clips.get(index).map(|c| c.1).ok_or(HoistError::InvalidClipIndex {
                index,
                count: self.clips.len(),
            })
        }

        fn clip_name(&self, index: usize) -> Result<String> {
            self.clips.get(index).map(|c| c.0.to_string()).ok_or(HoistError::InvalidClipIndex {
                index,
                count: self.clips.len(),
            })
        }

        fn apply_pose(&mut self, index: usize, in_clip_time: f32) -> Result<()> {
            if self.reject_poses || index >= self.clips.len() {
                return Err(HoistError::InvalidClipIndex {
                    index,
                    count: self.clips.len(),
                });
            }
            self.calls.push(Call::Pose(index, in_clip_time));
            Ok(())
        }

        fn update_bone_matrices(&mut self) {
            self.calls.push(Call::Bones);
        }

        fn render(&mut self, timestamp: Instant) -> Result<()> {
            self.calls.push(Call::Render(timestamp));
            Ok(())
        }
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn attached(t0: Instant) -> PlaybackController<FakeModel, NoticeQueue> {
        let mut controller = PlaybackController::with_notifier(NoticeQueue::new());
        controller
            .attach_at(FakeModel::lift(), PlaybackDefaults::default(), t0)
            .unwrap();
        controller
    }

    fn last_pose(controller: &PlaybackController<FakeModel, NoticeQueue>) -> (usize, f32) {
        *controller.model().unwrap().poses().last().unwrap()
    }

    #[test]
    fn test_operations_before_attach_are_not_ready() {
        let mut controller: PlaybackController<FakeModel, NoticeQueue> =
            PlaybackController::with_notifier(NoticeQueue::new());
        let now = Instant::now();
        assert!(!controller.is_ready());
        assert!(matches!(controller.select_clip_at(0, true, now), Err(HoistError::NotReady)));
        assert!(matches!(controller.increase_speed_at(now), Err(HoistError::NotReady)));
        assert!(matches!(controller.decrease_speed_at(now), Err(HoistError::NotReady)));
        assert!(matches!(controller.tick(now), Err(HoistError::NotReady)));
        assert!(controller.notifier().is_empty());
    }

    #[test]
    fn test_attach_rejects_missing_default_clip() {
        let mut controller: PlaybackController<FakeModel, NoticeQueue> =
            PlaybackController::with_notifier(NoticeQueue::new());
        let defaults = PlaybackDefaults {
            clip: 9,
            ..Default::default()
        };
        let result = controller.attach_at(FakeModel::lift(), defaults, Instant::now());
        assert!(matches!(result, Err(HoistError::InvalidClipIndex { index: 9, count: 4 })));
        assert!(!controller.is_ready());
    }

    #[test]
    fn test_selection_notifies_with_clip_metadata() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(3, false, t0).unwrap();

        let notices = controller.notifier_mut().drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].clip_name, "up");
        assert_eq!(notices[0].duration, 2.0);
        assert!(!notices[0].is_degenerate);
    }

    #[test]
    fn test_invalid_selection_keeps_previous_playback() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(2, true, t0).unwrap();
        let before = controller.state().unwrap().clone();

        let result = controller.select_clip_at(4, false, t0 + secs(1.0));
        assert!(matches!(result, Err(HoistError::InvalidClipIndex { index: 4, count: 4 })));
        assert_eq!(controller.state().unwrap(), &before);
        assert_eq!(controller.notifier().len(), 1);
    }

    #[test]
    fn test_frame_applies_pose_then_bones_then_render() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(3, false, t0).unwrap();
        let now = t0 + secs(0.5);
        controller.tick(now).unwrap();

        assert_eq!(
            controller.model().unwrap().calls,
            vec![Call::Pose(3, 0.5), Call::Bones, Call::Render(now)]
        );
    }

    #[test]
    fn test_one_shot_up_pins_at_final_frame() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(3, false, t0).unwrap();

        let mid = controller.tick(t0 + secs(0.5)).unwrap();
        assert!((mid.in_clip_time - 0.5).abs() < 1e-9);
        assert!(!mid.pinned);

        let end = controller.tick(t0 + secs(3.0)).unwrap();
        assert!(end.pinned);
        assert_eq!(last_pose(&controller), (3, 2.0));

        let later = controller.tick(t0 + secs(30.0)).unwrap();
        assert_eq!(later.in_clip_time, 2.0);
    }

    #[test]
    fn test_looping_idle_mid_at_double_speed() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(2, true, t0).unwrap();
        assert_eq!(controller.increase_speed_at(t0).unwrap().get(), 2);

        controller.tick(t0 + secs(1.0)).unwrap();
        let (index, t) = last_pose(&controller);
        assert_eq!(index, 2);
        assert!((t - 0.5).abs() < EPS);
    }

    #[test]
    fn test_degenerate_clip_holds_bind_pose_every_tick() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(0, true, t0).unwrap();
        for i in 1..=5 {
            let reading = controller.tick(t0 + secs(0.25 * i as f64)).unwrap();
            assert!(reading.degenerate);
        }

        let poses = controller.model().unwrap().poses();
        assert_eq!(poses, vec![(0, 0.0); 5]);

        let notices = controller.notifier_mut().drain();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_degenerate);
    }

    #[test]
    fn test_reselecting_restarts_from_zero() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(1, true, t0).unwrap();
        controller.tick(t0 + secs(0.75)).unwrap();

        let again = t0 + secs(0.75);
        controller.select_clip_at(1, true, again).unwrap();
        let reading = controller.read_clock(again).unwrap();
        assert_eq!(reading.in_clip_time, 0.0);

        // Also from a pinned one-shot onto a different clip
        controller.select_clip_at(3, false, t0).unwrap();
        controller.tick(t0 + secs(10.0)).unwrap();
        controller.select_clip_at(2, false, t0 + secs(10.0)).unwrap();
        assert_eq!(controller.read_clock(t0 + secs(10.0)).unwrap().in_clip_time, 0.0);
    }

    #[test]
    fn test_speed_never_drops_to_zero() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        for _ in 0..5 {
            assert_eq!(controller.decrease_speed_at(t0).unwrap().get(), 1);
        }
        controller.select_clip_at(2, true, t0).unwrap();
        controller.decrease_speed_at(t0).unwrap();
        let reading = controller.tick(t0 + secs(0.5)).unwrap();
        assert!((reading.in_clip_time - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_speed_round_trip_restores_multiplier() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.increase_speed_at(t0).unwrap();
        controller.increase_speed_at(t0).unwrap();
        let start = controller.speed().unwrap();
        controller.increase_speed_at(t0).unwrap();
        assert_eq!(controller.decrease_speed_at(t0).unwrap(), start);
    }

    #[test]
    fn test_speed_change_does_not_jump() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(3, false, t0).unwrap();
        let now = t0 + secs(0.5);
        let before = controller.read_clock(now).unwrap().in_clip_time;
        controller.increase_speed_at(now).unwrap();
        let after = controller.read_clock(now).unwrap().in_clip_time;
        assert!((before - after).abs() < 1e-6);

        // 0.25s later at 2x the clip has moved 0.5s
        let next = controller.read_clock(now + secs(0.25)).unwrap().in_clip_time;
        assert!((next - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_queued_commands_apply_on_next_frame() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        let handle = controller.control_handle();

        handle.select_clip(3, false).unwrap();
        handle.increase_speed().unwrap();
        handle.select_clip(42, true).unwrap();
        assert_eq!(controller.state().unwrap().clip, 0);

        let frame = t0 + secs(1.0);
        let reading = controller.tick(frame).unwrap();
        let state = controller.state().unwrap();
        assert_eq!(state.clip, 3);
        assert_eq!(state.speed.get(), 2);
        assert_eq!(state.started_at, frame);
        assert_eq!(reading.in_clip_time, 0.0);
        assert_eq!(controller.notifier().len(), 1);
    }

    #[test]
    fn test_new_handle_disconnects_old_one() {
        let mut controller = attached(Instant::now());
        let old = controller.control_handle();
        let _new = controller.control_handle();
        assert!(old.increase_speed().is_err());
    }

    #[test]
    fn test_empty_model_still_renders() {
        let t0 = Instant::now();
        let mut controller: PlaybackController<FakeModel, NoticeQueue> =
            PlaybackController::with_notifier(NoticeQueue::new());
        let model = FakeModel {
            clips: Vec::new(),
            calls: Vec::new(),
            reject_poses: false,
        };
        controller.attach_at(model, PlaybackDefaults::default(), t0).unwrap();

        let reading = controller.tick(t0 + secs(1.0)).unwrap();
        assert!(reading.degenerate);
        assert_eq!(
            controller.model().unwrap().calls,
            vec![Call::Bones, Call::Render(t0 + secs(1.0))]
        );
        assert!(matches!(
            controller.select_clip_at(0, true, t0),
            Err(HoistError::InvalidClipIndex { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_select_clip_uses_injected_clock() {
        let clock = std::rc::Rc::new(ManualClock::new());
        let mut controller = PlaybackController::with_notifier(NoticeQueue::new())
            .with_clock(std::rc::Rc::clone(&clock));
        controller.attach(FakeModel::lift(), PlaybackDefaults::default()).unwrap();

        clock.advance(secs(5.0));
        controller.select_clip(1, true).unwrap();
        assert_eq!(controller.state().unwrap().started_at, clock.now());
    }

    #[test]
    fn test_scheduler_drives_controller_until_stopped() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(3, false, t0).unwrap();
        let mut scheduler = FrameScheduler::new(HostDriver::new());
        scheduler.start();

        for i in 1..=3 {
            let tick = scheduler.driver_mut().fire(t0 + secs(0.25 * i as f64)).unwrap();
            assert!(scheduler.on_frame(tick, &mut controller).unwrap());
        }
        let in_flight = scheduler.driver_mut().fire(t0 + secs(1.0)).unwrap();
        scheduler.stop();
        assert!(!scheduler.on_frame(in_flight, &mut controller).unwrap());

        let poses = controller.model().unwrap().poses();
        assert_eq!(poses.len(), 3);
        assert!((poses[2].1 - 0.75).abs() < EPS);
    }

    #[test]
    fn test_rejected_pose_fails_the_frame() {
        let t0 = Instant::now();
        let mut controller = attached(t0);
        controller.select_clip_at(2, true, t0).unwrap();
        let before = controller.state().unwrap().clone();
        controller.model_mut().unwrap().reject_poses = true;

        let result = controller.tick(t0 + secs(0.5));
        assert!(matches!(result, Err(HoistError::InvalidClipIndex { index: 2, count: 4 })));
        assert_eq!(controller.state().unwrap(), &before);

        let calls = &controller.model().unwrap().calls;
        assert!(calls.is_empty());
        assert!(!calls.iter().any(|c| matches!(c, Call::Render(_))));

        // Through the runtime system the error surfaces the same way
        assert!(matches!(
            controller.update(t0 + secs(0.6)),
            Err(HoistError::InvalidClipIndex { .. })
        ));
    }
}
