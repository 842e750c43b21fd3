//! Pinnable field wrapper for per-request context values.

/// A context field that can be pinned against later reassignment.
///
/// Writes to a locked field are silently dropped rather than reported as
/// errors, so middleware further down the chain keeps running unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locked<T> {
    value: T,
    locked: bool,
}

impl<T> Locked<T> {
    /// Create an unlocked field holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value,
            locked: false,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Assign a new value. Returns `false` if the field is locked and the
    /// write was ignored.
    pub fn set(&mut self, value: T) -> bool {
        if self.locked {
            tracing::trace!("ignoring write to pinned context field");
            return false;
        }
        self.value = value;
        true
    }

    /// Store `value` and lock the field for the rest of the request.
    pub fn pin(&mut self, value: T) {
        self.value = value;
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
