//! Page navigation outside the router's control.
//!
//! The API client needs to force the browser to `/login` when a session
//! expires, and the router needs to follow guard redirects. Both go through a
//! [`Navigator`] so the same logic runs in the browser and in tests.

use std::cell::RefCell;
use std::rc::Rc;

/// Something that can send the user to another page.
pub trait Navigator {
    /// Navigates to `path`.
    fn navigate(&self, path: &str);
}

/// Full-page navigation via `window.location.href`.
///
/// Outside the browser this only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    #[cfg(target_arch = "wasm32")]
    fn navigate(&self, path: &str) {
        match web_sys::window() {
            Some(window) => {
                if window.location().set_href(path).is_err() {
                    tracing::error!("Failed to navigate to {}", path);
                } else {
                    tracing::trace!("Navigating to {}", path);
                }
            }
            None => tracing::error!("Failed to get window for navigation to {}", path),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn navigate(&self, path: &str) {
        tracing::warn!("Navigation to {} not supported in non-WASM builds", path);
    }
}

/// Records navigations instead of performing them.
///
/// Clones share the same history.
#[derive(Clone, Debug, Default)]
pub struct MemoryNavigator {
    history: Rc<RefCell<Vec<String>>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path navigated to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    /// The most recent navigation target.
    pub fn current(&self) -> Option<String> {
        self.history.borrow().last().cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, path: &str) {
        tracing::trace!("Recorded navigation to {}", path);
        self.history.borrow_mut().push(path.to_string());
    }
}

/// Navigator for the current target: the browser location on WASM, a
/// recording navigator elsewhere.
pub fn default_navigator() -> Rc<dyn Navigator> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserNavigator)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryNavigator::new())
    }
}
