// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use creditfix_app::{EventSink, SectionEvent};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::APP_NAME;

pub const LOG_ENV: &str = "CREDITFIX_LOG";
pub const LOG_PATH_ENV: &str = "CREDITFIX_LOG_PATH";

/// Where log lines go. The terminal UI owns the screen, so it logs to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    StateFile,
}

pub fn default_log_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let state_root = dirs::state_dir().or_else(dirs::cache_dir).ok_or_else(|| {
        anyhow!("cannot resolve a log directory; set {LOG_PATH_ENV} to the log file")
    })?;
    Ok(state_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
}

/// Installs the subscriber. Logging stays off, and no file is created, unless
/// `CREDITFIX_LOG` sets a filter.
pub fn init(target: LogTarget) -> Result<()> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return Ok(());
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::StateFile => {
            let file = open_log_file(&default_log_path()?)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Forwards section events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &SectionEvent) {
        let section = event.section().anchor();
        match event {
            SectionEvent::ViewChanged { phase, .. } => {
                debug!(section, event = event.name(), phase = phase.label());
            }
            SectionEvent::GroupSaved { group, saved, .. } => {
                debug!(section, event = event.name(), group = group.label(), saved);
            }
            SectionEvent::GroupDisputeStored {
                group, selections, ..
            } => {
                debug!(
                    section,
                    event = event.name(),
                    group = group.label(),
                    selections
                );
            }
            SectionEvent::GroupCleared { group, .. } => {
                debug!(section, event = event.name(), group = group.label());
            }
            SectionEvent::DisputeSaved {
                record_id, status, ..
            } => {
                debug!(
                    section,
                    event = event.name(),
                    record_id = record_id.as_str(),
                    saved = status.is_saved()
                );
            }
            SectionEvent::DisputeReset { record_id, .. } => {
                debug!(
                    section,
                    event = event.name(),
                    record_id = record_id.as_str()
                );
            }
            SectionEvent::PhaseApplied { phase, .. } | SectionEvent::ScrollSkipped { phase, .. } => {
                debug!(section, event = event.name(), phase = phase.label());
            }
            SectionEvent::SectionReset { .. }
            | SectionEvent::SequenceStarted { .. }
            | SectionEvent::SequenceCancelled { .. }
            | SectionEvent::SequenceCompleted { .. } => {
                debug!(section, event = event.name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LOG_PATH_ENV, TracingSink, default_log_path, open_log_file};
    use anyhow::Result;
    use creditfix_app::{EventSink, InquiryGroup, Phase, SectionEvent, SectionKind};
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            let bytes = match self.0.lock() {
                Ok(guard) => guard.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            };
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match self.0.lock() {
                Ok(mut guard) => guard.extend_from_slice(buf),
                Err(poisoned) => poisoned.into_inner().extend_from_slice(buf),
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_events(events: &[SectionEvent]) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let mut sink = TracingSink;
            for event in events {
                sink.emit(event);
            }
        });
        capture.text()
    }

    #[test]
    fn sink_logs_event_name_and_phase() {
        let output = capture_events(&[SectionEvent::PhaseApplied {
            section: SectionKind::HardInquiries,
            phase: Phase::Collapse,
        }]);
        assert!(output.contains("DEBUG"), "{output}");
        assert!(output.contains("hard-inquiries"), "{output}");
        assert!(output.contains("phase_applied"), "{output}");
        assert!(output.contains("collapse"), "{output}");
    }

    #[test]
    fn sink_logs_one_line_per_event() {
        let output = capture_events(&[
            SectionEvent::SequenceStarted {
                section: SectionKind::HardInquiries,
            },
            SectionEvent::GroupCleared {
                section: SectionKind::PublicRecords,
                group: InquiryGroup::Older,
            },
            SectionEvent::SequenceCompleted {
                section: SectionKind::HardInquiries,
            },
        ]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3, "{output}");
        assert!(lines[0].contains("sequence_started"));
        assert!(lines[1].contains("group_cleared"));
        assert!(lines[1].contains("public-records"));
        assert!(lines[2].contains("sequence_completed"));
    }

    #[test]
    fn log_file_is_created_with_parent_directories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("creditfix.log");
        let mut file = open_log_file(&path)?;
        writeln!(file, "first")?;
        drop(file);
        let mut file = open_log_file(&path)?;
        writeln!(file, "second")?;
        assert_eq!(std::fs::read_to_string(&path)?, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn default_log_path_honors_env_override() -> Result<()> {
        let _guard = crate::config::tests::env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom.log");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(LOG_PATH_ENV, &override_path);
        }
        let resolved = default_log_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(LOG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }
}
