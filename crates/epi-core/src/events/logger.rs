//! Event Logger
//!
//! Append-only JSONL event logging.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use epi_events::{generate_event_id, TransitionEvent};

use crate::systems::Transition;

/// Writes transition events to a JSONL file, one event per line.
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
    next_event_id: u64,
}

impl EventLogger {
    /// Create a new event logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
            next_event_id: 1,
        })
    }

    /// Create a logger that discards events (for testing, or when disabled)
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
            next_event_id: 1,
        }
    }

    /// Generate the next event ID
    pub fn next_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    /// Get the current event count
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Log an event to the file
    pub fn log(&mut self, event: &TransitionEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = event.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Log every transition committed during `tick`, in commit order
    pub fn log_transitions(&mut self, tick: u64, transitions: &[Transition]) -> std::io::Result<()> {
        for transition in transitions {
            let id = self.next_id();
            if let Some(event) = transition.to_event(id, tick) {
                self.log(&event)?;
            }
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush event log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epi_events::{HealthState, TransitionKind};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_null_logger_counts_but_discards() {
        let mut logger = EventLogger::null();
        let transitions = [
            Transition::new(0, HealthState::Susceptible, HealthState::Infected),
            Transition::new(1, HealthState::Infected, HealthState::Dead),
        ];
        logger.log_transitions(1, &transitions).unwrap();
        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.next_id(), "evt_00000003");
    }

    #[test]
    fn test_writes_jsonl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        {
            let mut logger = EventLogger::new(&path).unwrap();
            logger
                .log_transitions(
                    4,
                    &[
                        Transition::new(7, HealthState::Susceptible, HealthState::Infected),
                        Transition::new(2, HealthState::Infected, HealthState::Recovered),
                    ],
                )
                .unwrap();
            logger.flush().unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let events: Vec<TransitionEvent> = content
            .lines()
            .map(|line| TransitionEvent::from_jsonl(line).unwrap())
            .collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, "evt_00000001");
        assert_eq!(events[0].agent_id, "agent_00007");
        assert_eq!(events[0].kind, TransitionKind::Infection);
        assert_eq!(events[1].kind, TransitionKind::Recovery);
        assert!(events.iter().all(|e| e.tick == 4));
    }

    #[test]
    fn test_drop_flushes_pending_events() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        {
            let mut logger = EventLogger::new(&path).unwrap();
            logger
                .log_transitions(1, &[Transition::new(0, HealthState::Infected, HealthState::Dead)])
                .unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_drop_survives_failed_flush() {
        // Writes to /dev/full fail with ENOSPC once the buffer is flushed.
        let mut logger = EventLogger::new("/dev/full").unwrap();
        logger
            .log_transitions(1, &[Transition::new(0, HealthState::Infected, HealthState::Dead)])
            .unwrap();
        assert!(logger.flush().is_err());

        logger
            .log_transitions(2, &[Transition::new(1, HealthState::Infected, HealthState::Dead)])
            .unwrap();
        drop(logger);
    }
}
