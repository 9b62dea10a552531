//! Process memory probe backed by `sysinfo`.
//!
//! The `System` handle and the process id are resolved once and reused;
//! each reading refreshes only this process. Readings are never cached
//! across calls — before/after deltas within a single instrumented call
//! must see fresh values.

use std::sync::Mutex;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, get_current_pid};
use tracing::warn;

struct ProbeInner {
    system: System,
    pid: Pid,
}

/// Reads the current process's memory usage for resource accounting.
///
/// Construction never fails: when the process id cannot be resolved the
/// probe stays unavailable and every reading returns `None`, which the
/// wrappers translate into an omitted `resource_usage` field.
pub struct ResourceProbe {
    inner: Option<Mutex<ProbeInner>>,
}

impl ResourceProbe {
    pub fn new() -> Self {
        match get_current_pid() {
            Ok(pid) => Self {
                inner: Some(Mutex::new(ProbeInner {
                    system: System::new(),
                    pid,
                })),
            },
            Err(err) => {
                warn!(error = %err, "resource probe unavailable");
                Self { inner: None }
            }
        }
    }

    /// Whether readings can be taken at all.
    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// Current memory usage of this process in bytes, or `None` when the
    /// reading cannot be taken.
    pub fn memory_bytes(&self) -> Option<u64> {
        let inner = self.inner.as_ref()?;
        let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
        let pid = inner.pid;
        inner.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        inner.system.process(pid).map(|p| p.memory())
    }
}

impl Default for ResourceProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_resolves_current_process() {
        let probe = ResourceProbe::new();
        assert!(probe.is_available());
        assert!(probe.memory_bytes().is_some());
    }

    #[test]
    fn repeated_readings_both_succeed() {
        let probe = ResourceProbe::new();
        let first = probe.memory_bytes();
        let second = probe.memory_bytes();
        assert!(first.is_some());
        assert!(second.is_some());
        // Deltas between two readings must be computable as a signed value.
        let delta = second.unwrap() as i64 - first.unwrap() as i64;
        assert!(delta.abs() < 1_i64 << 40);
    }
}
