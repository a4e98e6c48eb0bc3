//! Test and helper mocks for doorwatch_core

use std::collections::VecDeque;
use std::time::Duration;

use doorwatch_traits::{BeamSensor, BoxError, Ranger};

use crate::notify::{DoorEvent, EventSink};

/// A sink that keeps every event it accepts.
///
/// `fail_next(n)` makes the next `n` posts fail; `failing_trigger` makes every
/// trigger call fail without affecting posts.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<DoorEvent>,
    pub triggers: usize,
    pub attempts: usize,
    fail_posts: usize,
    failing_trigger: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&mut self, n: usize) {
        self.fail_posts = n;
    }

    pub fn failing_trigger(mut self) -> Self {
        self.failing_trigger = true;
        self
    }

    /// `doorStatus` of every accepted event, in order.
    pub fn doors(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.door_status.as_str()).collect()
    }
}

impl EventSink for RecordingSink {
    fn post_event(&mut self, event: &DoorEvent) -> Result<(), BoxError> {
        self.attempts += 1;
        if self.fail_posts > 0 {
            self.fail_posts -= 1;
            return Err("connection refused".into());
        }
        self.events.push(event.clone());
        Ok(())
    }

    fn fire_trigger(&mut self) -> Result<(), BoxError> {
        self.triggers += 1;
        if self.failing_trigger {
            return Err("trigger unreachable".into());
        }
        Ok(())
    }
}

/// Plays back a fixed list of distances; `None` entries time out. Once the
/// script runs dry every call times out.
#[derive(Debug, Default)]
pub struct ScriptedRanger {
    script: VecDeque<Option<f32>>,
}

impl ScriptedRanger {
    pub fn new(script: impl IntoIterator<Item = Option<f32>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn distances(cms: impl IntoIterator<Item = f32>) -> Self {
        Self::new(cms.into_iter().map(Some))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Ranger for ScriptedRanger {
    fn measure(&mut self, _timeout: Duration) -> Result<f32, BoxError> {
        match self.script.pop_front().flatten() {
            Some(cm) => Ok(cm),
            None => Err("echo timeout".into()),
        }
    }
}

/// Plays back beam levels; `Err` entries simulate read failures. Reads clear
/// once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedBeam {
    script: VecDeque<Result<bool, String>>,
}

impl ScriptedBeam {
    pub fn new(script: impl IntoIterator<Item = Result<bool, String>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn levels(levels: impl IntoIterator<Item = bool>) -> Self {
        Self::new(levels.into_iter().map(Ok))
    }

    pub fn clear() -> Self {
        Self::default()
    }
}

impl BeamSensor for ScriptedBeam {
    fn is_broken(&mut self) -> Result<bool, BoxError> {
        match self.script.pop_front() {
            Some(Ok(b)) => Ok(b),
            Some(Err(msg)) => Err(msg.into()),
            None => Ok(false),
        }
    }
}
