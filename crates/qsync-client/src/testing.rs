//! Scripted in-memory hub for unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::transport::{Connector, Transport};
use crate::{QsyncError, Result};

#[path = "../tests/common/records.rs"]
mod records;

pub use records::*;

/// One scripted event on the wire.
#[derive(Debug, Clone)]
pub enum Step {
    /// The next read returns these bytes.
    Reply(Vec<u8>),
    /// The hub goes quiet; a drain stops here and a read times out.
    Quiet,
}

#[derive(Debug, Default)]
pub struct HubState {
    pub steps: VecDeque<Step>,
    pub sent: Vec<Vec<u8>>,
    pub connects: usize,
    pub drains: usize,
}

/// Connector handing out transports that share one script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHub {
    state: Arc<Mutex<HubState>>,
}

impl ScriptedHub {
    pub fn new(steps: Vec<Step>) -> Self {
        ScriptedHub {
            state: Arc::new(Mutex::new(HubState {
                steps: steps.into(),
                ..Default::default()
            })),
        }
    }

    pub fn replies(replies: Vec<Vec<u8>>) -> Self {
        Self::new(replies.into_iter().map(Step::Reply).collect())
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn drains(&self) -> usize {
        self.state.lock().unwrap().drains
    }

    pub fn remaining(&self) -> usize {
        self.state.lock().unwrap().steps.len()
    }
}

impl Connector for ScriptedHub {
    type Transport = ScriptedTransport;

    fn connect(&self, _host: &str) -> Result<ScriptedTransport> {
        self.state.lock().unwrap().connects += 1;
        Ok(ScriptedTransport {
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub struct ScriptedTransport {
    state: Arc<Mutex<HubState>>,
}

impl Transport for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.state.lock().unwrap().sent.push(data.to_vec());
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        match self.state.lock().unwrap().steps.pop_front() {
            Some(Step::Reply(data)) => Ok(data),
            Some(Step::Quiet) | None => Err(QsyncError::connection(
                "timed out waiting for scripted hub",
                io::Error::from(io::ErrorKind::TimedOut),
            )),
        }
    }

    fn drain(&mut self, _quiet: Duration) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.drains += 1;
        let mut discarded = 0;
        while let Some(step) = state.steps.pop_front() {
            match step {
                Step::Reply(data) => discarded += data.len(),
                Step::Quiet => break,
            }
        }
        Ok(discarded)
    }
}
