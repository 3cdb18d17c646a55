//! Shared notification permission state.

use std::cell::Cell;
use std::rc::Rc;

use crate::types::NotificationPermission;

/// Handle to the notification permission shared by the host and gateway.
///
/// Clones refer to the same value. Only the gateway's permission request
/// writes to it; the timer only reads it.
#[derive(Debug, Clone, Default)]
pub struct PermissionStore {
    inner: Rc<Cell<NotificationPermission>>,
}

impl PermissionStore {
    /// Creates a store holding the given initial permission.
    #[must_use]
    pub fn new(initial: NotificationPermission) -> Self {
        Self {
            inner: Rc::new(Cell::new(initial)),
        }
    }

    /// Returns the current permission.
    #[must_use]
    pub fn get(&self) -> NotificationPermission {
        self.inner.get()
    }

    pub(crate) fn set(&self, permission: NotificationPermission) {
        self.inner.set(permission);
    }
}
