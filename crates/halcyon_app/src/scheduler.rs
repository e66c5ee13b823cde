/// Run state of the frame loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// The `Stopped → Running ⇄ Paused → Stopped` lifecycle.
///
/// Transition methods return whether the state changed; calls that do not
/// apply in the current state are ignored.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    state: SchedulerState,
    frames: u64,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Frames executed while `Running`.
    #[inline]
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) -> bool {
        self.transition(SchedulerState::Stopped, SchedulerState::Running)
    }

    pub fn pause(&mut self) -> bool {
        self.transition(SchedulerState::Running, SchedulerState::Paused)
    }

    pub fn resume(&mut self) -> bool {
        self.transition(SchedulerState::Paused, SchedulerState::Running)
    }

    pub fn stop(&mut self) -> bool {
        if self.state == SchedulerState::Stopped {
            return false;
        }
        log::debug!("Scheduler: {:?} -> Stopped", self.state);
        self.state = SchedulerState::Stopped;
        true
    }

    /// Counts a frame if running. Returns whether the frame should execute.
    pub(crate) fn begin_frame(&mut self) -> bool {
        if self.is_running() {
            self.frames += 1;
            true
        } else {
            false
        }
    }

    fn transition(&mut self, from: SchedulerState, to: SchedulerState) -> bool {
        if self.state != from {
            log::debug!("Scheduler: ignoring {from:?} -> {to:?} while {:?}", self.state);
            return false;
        }
        log::debug!("Scheduler: {from:?} -> {to:?}");
        self.state = to;
        true
    }
}
