//! Scripted mock climate chip.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::climate::{ClimateChip, ClimateSample};
use crate::error::{HardwareError, Result};

#[derive(Debug)]
enum ReadStep {
    NotReady,
    Ready(ClimateSample),
    Fail(String),
}

#[derive(Debug, Default)]
struct State {
    fail_configure: bool,
    steps: VecDeque<ReadStep>,
    configure_calls: u32,
    trigger_calls: u32,
    read_calls: u32,
}

/// Mock climate chip.
///
/// `try_read` pops scripted steps queued through the [`MockClimateHandle`];
/// an exhausted queue reports data-not-ready forever, which exercises the
/// reader's bounded retry budget. Call counters let tests assert that a
/// disabled sensor never touches the transport again.
#[derive(Debug)]
pub struct MockClimateChip {
    state: Arc<Mutex<State>>,
}

impl MockClimateChip {
    /// Create a mock chip and its scripting handle.
    pub fn new() -> (Self, MockClimateHandle) {
        Self::build(false)
    }

    /// Create a mock chip whose `configure` fails, simulating a sensor that
    /// is absent or broken at startup.
    pub fn failing_configure() -> (Self, MockClimateHandle) {
        Self::build(true)
    }

    fn build(fail_configure: bool) -> (Self, MockClimateHandle) {
        let state = Arc::new(Mutex::new(State {
            fail_configure,
            ..State::default()
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockClimateHandle { state },
        )
    }
}

impl ClimateChip for MockClimateChip {
    fn configure(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.configure_calls += 1;
        if state.fail_configure {
            Err(HardwareError::initialization_failed(
                "scripted configure failure",
            ))
        } else {
            Ok(())
        }
    }

    fn trigger_measurement(&mut self) -> Result<()> {
        self.state.lock().unwrap().trigger_calls += 1;
        Ok(())
    }

    fn try_read(&mut self) -> Result<Option<ClimateSample>> {
        let mut state = self.state.lock().unwrap();
        state.read_calls += 1;

        match state.steps.pop_front() {
            Some(ReadStep::Ready(sample)) => Ok(Some(sample)),
            Some(ReadStep::NotReady) | None => Ok(None),
            Some(ReadStep::Fail(message)) => Err(HardwareError::transfer(message)),
        }
    }
}

/// Scripting handle for a [`MockClimateChip`]. Cloneable; all clones share
/// state.
#[derive(Debug, Clone)]
pub struct MockClimateHandle {
    state: Arc<Mutex<State>>,
}

impl MockClimateHandle {
    /// Queue `count` data-not-ready polls.
    pub fn push_not_ready(&self, count: u32) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..count {
            state.steps.push_back(ReadStep::NotReady);
        }
    }

    /// Queue a finished measurement.
    pub fn push_ready(&self, sample: ClimateSample) {
        self.state.lock().unwrap().steps.push_back(ReadStep::Ready(sample));
    }

    /// Queue a failing poll.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .steps
            .push_back(ReadStep::Fail(message.into()));
    }

    pub fn configure_calls(&self) -> u32 {
        self.state.lock().unwrap().configure_calls
    }

    pub fn trigger_calls(&self) -> u32 {
        self.state.lock().unwrap().trigger_calls
    }

    pub fn read_calls(&self) -> u32 {
        self.state.lock().unwrap().read_calls
    }
}
