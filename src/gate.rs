// src/gate.rs

//! Scheduling policy gate.
//!
//! An external policy (in practice a settings store owned by the host) can
//! disallow scheduling altogether. The gate is consulted exactly once per
//! `start()` call; a denied start is logged and becomes a no-op.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Abstract start-permission check.
pub trait SchedulingGate: Send + Sync + Debug {
    /// Whether a new run may begin right now.
    fn allows_start(&self) -> bool;
}

/// Gate that always permits scheduling; the default for deployments with no
/// policy store.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl SchedulingGate for AllowAll {
    fn allows_start(&self) -> bool {
        true
    }
}

/// Gate backed by a shared boolean flag, suitable for mirroring a toggle
/// from an external settings store.
#[derive(Debug, Clone)]
pub struct SharedFlagGate {
    enabled: Arc<AtomicBool>,
}

impl SharedFlagGate {
    pub fn new(initially_enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(initially_enabled)),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

impl SchedulingGate for SharedFlagGate {
    fn allows_start(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}
