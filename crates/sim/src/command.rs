//! Commands posted from other threads and applied at tick boundaries.
//!
//! Producers hold a cloned [`CommandQueue`]; the simulation drains it at the
//! start of every tick, so an edit never lands in the middle of a sub-step.

use crate::controller::Parameters;
use crate::forcing::{Sign, Tool};
use crate::journey::JourneyKind;
use crossbeam_queue::SegQueue;
use rd_engine_core::grid::Channel;
use rd_engine_core::seed::SeedPattern;
use std::sync::Arc;

/// One deferred mutation of a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Force {
        x: f64,
        y: f64,
        radius: f64,
        strength: f64,
        channel: Channel,
        sign: Sign,
    },
    Stamp {
        x: f64,
        y: f64,
        radius: f64,
        channel: Channel,
    },
    Tool {
        tool: Tool,
        x: f64,
        y: f64,
    },
    SetParameters(Parameters),
    EaseTo {
        feed: f64,
        kill: f64,
        duration_ms: f64,
    },
    SetJourney {
        kind: JourneyKind,
        speed: f64,
    },
    StopJourney,
    SetSimSpeed(f64),
    /// Jump to a named preset of the current model.
    ApplyPreset(String),
    Reseed(SeedPattern),
}

/// Multi-producer handle onto a simulation's pending commands.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<SegQueue<Command>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: Command) {
        self.inner.push(command);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Removes every pending command in FIFO order.
    pub fn drain(&self) -> Vec<Command> {
        let mut out = Vec::with_capacity(self.inner.len());
        while let Some(cmd) = self.inner.pop() {
            out.push(cmd);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn drain_preserves_order() {
        let q = CommandQueue::new();
        q.push(Command::StopJourney);
        q.push(Command::SetSimSpeed(2.0));
        q.push(Command::Reseed(SeedPattern::Empty));
        assert_eq!(q.len(), 3);
        assert_eq!(
            q.drain(),
            vec![
                Command::StopJourney,
                Command::SetSimSpeed(2.0),
                Command::Reseed(SeedPattern::Empty),
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn clones_share_one_queue() {
        let q = CommandQueue::new();
        let producer = q.clone();
        producer.push(Command::StopJourney);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn accepts_commands_from_many_threads() {
        let q = CommandQueue::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let q = q.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        q.push(Command::Stamp {
                            x: i as f64,
                            y: j as f64,
                            radius: 1.0,
                            channel: Channel::B,
                        });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(q.drain().len(), 400);
    }
}
