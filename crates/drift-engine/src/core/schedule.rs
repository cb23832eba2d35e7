//! Frame scheduling.
//!
//! The field never runs a free timer. It asks a [`FrameSource`] for the next
//! display refresh and remembers the pending request in a [`FrameScheduler`],
//! one slot per [`FrameLane`]. Hosts fire the frame by calling back into the
//! field; tests use [`ManualFrames`] to single-step.

/// Independent chains of frame callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameLane {
    /// Main swarm update. Stopped by pause.
    Swarm,
    /// Burst countdown. Keeps running while the swarm is paused.
    Burst,
}

impl FrameLane {
    pub const ALL: [FrameLane; 2] = [FrameLane::Swarm, FrameLane::Burst];

    fn slot(self) -> usize {
        match self {
            FrameLane::Swarm => 0,
            FrameLane::Burst => 1,
        }
    }
}

/// Handle returned by a frame source for one pending callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Something that can deliver "next display refresh" callbacks.
///
/// `request_frame` returns `None` when the display refuses (no window, detached
/// surface); the lane then simply stays idle.
pub trait FrameSource {
    fn request_frame(&mut self, lane: FrameLane) -> Option<FrameId>;
    fn cancel_frame(&mut self, id: FrameId);
}

/// At most one pending frame per lane.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: [Option<FrameId>; 2],
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame for `lane` unless one is already pending.
    /// Returns true if a new request was made.
    pub fn schedule<F: FrameSource>(&mut self, lane: FrameLane, frames: &mut F) -> bool {
        let slot = &mut self.pending[lane.slot()];
        if slot.is_some() {
            return false;
        }
        *slot = frames.request_frame(lane);
        slot.is_some()
    }

    /// Cancel the pending frame for `lane`. Returns true if one was cancelled.
    pub fn cancel<F: FrameSource>(&mut self, lane: FrameLane, frames: &mut F) -> bool {
        match self.pending[lane.slot()].take() {
            Some(id) => {
                frames.cancel_frame(id);
                true
            }
            None => false,
        }
    }

    /// Mark the pending frame for `lane` as delivered.
    pub fn fired(&mut self, lane: FrameLane) {
        self.pending[lane.slot()] = None;
    }

    pub fn is_pending(&self, lane: FrameLane) -> bool {
        self.pending[lane.slot()].is_some()
    }
}

/// Frame source driven by hand. Used by tests and by headless hosts that own
/// their own loop.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    pending: Vec<(FrameId, FrameLane)>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outstanding requests for `lane`.
    pub fn pending_for(&self, lane: FrameLane) -> usize {
        self.pending.iter().filter(|(_, l)| *l == lane).count()
    }

    /// Total outstanding requests.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pop the oldest outstanding request. The caller delivers it to the field.
    pub fn take_next(&mut self) -> Option<FrameLane> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0).1)
        }
    }

    /// Pop the oldest outstanding request for a specific lane.
    pub fn take_lane(&mut self, lane: FrameLane) -> bool {
        match self.pending.iter().position(|(_, l)| *l == lane) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl FrameSource for ManualFrames {
    fn request_frame(&mut self, lane: FrameLane) -> Option<FrameId> {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending.push((id, lane));
        Some(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.pending.retain(|(pending, _)| *pending != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_idempotent() {
        let mut frames = ManualFrames::new();
        let mut sched = FrameScheduler::new();
        assert!(sched.schedule(FrameLane::Swarm, &mut frames));
        assert!(!sched.schedule(FrameLane::Swarm, &mut frames));
        assert_eq!(frames.pending_for(FrameLane::Swarm), 1);
    }

    #[test]
    fn cancel_releases_request() {
        let mut frames = ManualFrames::new();
        let mut sched = FrameScheduler::new();
        sched.schedule(FrameLane::Swarm, &mut frames);
        assert!(sched.cancel(FrameLane::Swarm, &mut frames));
        assert!(!sched.cancel(FrameLane::Swarm, &mut frames));
        assert_eq!(frames.pending_len(), 0);
        assert!(!sched.is_pending(FrameLane::Swarm));
    }

    #[test]
    fn lanes_are_independent() {
        let mut frames = ManualFrames::new();
        let mut sched = FrameScheduler::new();
        sched.schedule(FrameLane::Swarm, &mut frames);
        sched.schedule(FrameLane::Burst, &mut frames);
        sched.cancel(FrameLane::Swarm, &mut frames);
        assert!(sched.is_pending(FrameLane::Burst));
        assert_eq!(frames.pending_for(FrameLane::Burst), 1);
        assert_eq!(frames.pending_for(FrameLane::Swarm), 0);
    }

    #[test]
    fn fired_allows_reschedule() {
        let mut frames = ManualFrames::new();
        let mut sched = FrameScheduler::new();
        sched.schedule(FrameLane::Swarm, &mut frames);
        assert_eq!(frames.take_next(), Some(FrameLane::Swarm));
        sched.fired(FrameLane::Swarm);
        assert!(sched.schedule(FrameLane::Swarm, &mut frames));
    }

    struct Refusing;

    impl FrameSource for Refusing {
        fn request_frame(&mut self, _lane: FrameLane) -> Option<FrameId> {
            None
        }
        fn cancel_frame(&mut self, _id: FrameId) {}
    }

    #[test]
    fn refused_request_leaves_lane_idle() {
        let mut sched = FrameScheduler::new();
        assert!(!sched.schedule(FrameLane::Swarm, &mut Refusing));
        assert!(!sched.is_pending(FrameLane::Swarm));
    }
}
