use super::{CommandOutput, Executor};
use crate::error::{Result, TntError};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Sync(Vec<String>),
    Capture(Vec<String>),
    Spawn(Vec<String>),
}

/// Records every argv and replays queued capture outputs in order.
/// Captures with nothing queued succeed with empty stdout.
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<Call>>,
    captures: Mutex<VecDeque<CommandOutput>>,
    fail_sync: Mutex<bool>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capture(self, output: CommandOutput) -> Self {
        self.captures.lock().unwrap().push_back(output);
        self
    }

    pub fn failing_sync(self) -> Self {
        *self.fail_sync.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sync_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Sync(args) => Some(args),
                _ => None,
            })
            .collect()
    }
}

impl Executor for MockExecutor {
    fn execute_sync(&self, args: &[String]) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Sync(args.to_vec()));
        if *self.fail_sync.lock().unwrap() {
            return Err(TntError::CommandFailed {
                program: args[0].clone(),
                code: Some(1),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    fn execute_capture(&self, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(Call::Capture(args.to_vec()));
        Ok(self
            .captures
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }

    fn spawn(&self, args: &[String]) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Spawn(args.to_vec()));
        Ok(())
    }
}
