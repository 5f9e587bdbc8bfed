use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::command::{CommandRunner, RunRequest, RunResult};
use crate::error::Result;

#[derive(Debug, Clone)]
struct Script {
    success: bool,
    stdout: String,
}

/// Recording command runner for testing without real processes.
///
/// Every invocation is recorded (rendered command line, in order). Results
/// are replayed from scripts keyed by the rendered command line; scripting
/// the same command twice queues a second result, and the last queued
/// result repeats once the queue is drained. Commands with no script
/// succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    scripts: RefCell<HashMap<String, VecDeque<Script>>>,
    calls: RefCell<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Script a successful command with captured stdout
    pub fn stub_output(&self, command: impl Into<String>, stdout: impl Into<String>) {
        self.push_script(
            command.into(),
            Script {
                success: true,
                stdout: stdout.into(),
            },
        );
    }

    /// Script a command that exits non-zero
    pub fn stub_failure(&self, command: impl Into<String>) {
        self.push_script(
            command.into(),
            Script {
                success: false,
                stdout: String::new(),
            },
        );
    }

    fn push_script(&self, command: String, script: Script) {
        self.scripts
            .borrow_mut()
            .entry(command)
            .or_default()
            .push_back(script);
    }

    /// Every command run so far, rendered, in execution order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Whether the given rendered command was run
    pub fn ran(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|call| call == command)
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, request: &RunRequest) -> Result<RunResult> {
        let rendered = request.to_string();
        self.calls.borrow_mut().push(rendered.clone());

        let mut scripts = self.scripts.borrow_mut();
        let result = match scripts.get_mut(&rendered) {
            Some(queue) => {
                let script = if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
                .unwrap_or(Script {
                    success: true,
                    stdout: String::new(),
                });
                RunResult {
                    success: script.success,
                    stdout: script.stdout,
                }
            }
            None => RunResult {
                success: true,
                stdout: String::new(),
            },
        };
        Ok(result)
    }
}
