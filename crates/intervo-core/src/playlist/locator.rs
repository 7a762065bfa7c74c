//! Revocable locators for loaded audio.
//!
//! A [`PlayableRef`] is minted per track and names the track's bytes inside a
//! [`LocatorStore`]. The output resource only ever sees the locator string and
//! resolves it through the same store. `PlayableRef` is deliberately not
//! `Clone` and `revoke` takes it by value, so each locator is released once.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

const SCHEME: &str = "blob:intervo/";

/// Owned handle to a live locator.
#[derive(Debug, PartialEq, Eq)]
pub struct PlayableRef {
    url: String,
}

impl PlayableRef {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for PlayableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Registry of live locators.
///
/// Cloning yields another handle to the same registry; the controller and the
/// output resource share one.
#[derive(Debug, Clone, Default)]
pub struct LocatorStore {
    live: Rc<RefCell<HashMap<String, Rc<[u8]>>>>,
}

impl LocatorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under a fresh locator.
    pub fn mint(&self, bytes: Rc<[u8]>) -> PlayableRef {
        let url = format!("{SCHEME}{}", Uuid::new_v4());
        self.live.borrow_mut().insert(url.clone(), bytes);
        PlayableRef { url }
    }

    /// Release a locator. Returns false if it was already gone.
    pub fn revoke(&self, reference: PlayableRef) -> bool {
        let removed = self.live.borrow_mut().remove(&reference.url).is_some();
        if !removed {
            tracing::warn!(reference = %reference, "revoked a locator that was not live");
        }
        removed
    }

    /// Look up the bytes behind a locator string.
    pub fn resolve(&self, reference: &str) -> Option<Rc<[u8]>> {
        self.live.borrow().get(reference).cloned()
    }

    pub fn is_live(&self, reference: &str) -> bool {
        self.live.borrow().contains_key(reference)
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }
}
