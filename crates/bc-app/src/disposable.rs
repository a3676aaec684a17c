//! Release handles for registrations made at host connection.
//!
//! Every registration hands back a [`Disposable`]; the host collects them in a
//! [`DisposableGroup`] and disposes the group once at disconnection.

use std::fmt;

type Release = Box<dyn FnOnce() + Send + Sync>;

/// A release action that runs at most once.
///
/// Dropping an undisposed handle does **not** release it: registrations live
/// until they are explicitly disposed.
#[must_use = "a registration is only released by calling `dispose`"]
pub struct Disposable {
    release: Option<Release>,
}

impl Disposable {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.release.is_none()
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// A composite handle disposed exactly once.
#[derive(Debug, Default)]
pub struct DisposableGroup {
    items: Vec<Disposable>,
    disposed: bool,
}

impl DisposableGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handle. Adding to an already disposed group releases the handle
    /// immediately so nothing outlives the group.
    pub fn add(&mut self, mut disposable: Disposable) {
        if self.disposed {
            disposable.dispose();
            return;
        }
        self.items.push(disposable);
    }

    /// Runs every release in insertion order. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for mut item in self.items.drain(..) {
            item.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
