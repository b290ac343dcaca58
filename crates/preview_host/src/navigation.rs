//! Navigation primitive contracts: reading the current location and rewriting the address bar.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Snapshot of the address-bar location relevant to in-app routing.
pub struct RouterLocation {
    /// Path component, always starting with `/`.
    pub pathname: String,
    /// Query string including its leading `?`, or empty.
    pub search: String,
    /// Fragment including its leading `#`, or empty.
    pub hash: String,
}

impl RouterLocation {
    /// Builds a location from a relative or origin-less href such as `/iframe.html?x=1#top`.
    ///
    /// Any scheme/authority prefix is discarded.
    pub fn from_href(href: &str) -> Self {
        let without_origin = match href.find("://") {
            Some(scheme_end) => {
                let rest = &href[scheme_end + 3..];
                rest.find(['/', '?', '#'])
                    .map(|start| &rest[start..])
                    .unwrap_or("")
            }
            None => href,
        };

        let (before_hash, hash) = match without_origin.find('#') {
            Some(idx) => (&without_origin[..idx], &without_origin[idx..]),
            None => (without_origin, ""),
        };
        let (pathname, search) = match before_hash.find('?') {
            Some(idx) => (&before_hash[..idx], &before_hash[idx..]),
            None => (before_hash, ""),
        };

        Self {
            pathname: if pathname.is_empty() {
                "/".to_string()
            } else {
                pathname.to_string()
            },
            search: if search == "?" {
                String::new()
            } else {
                search.to_string()
            },
            hash: hash.to_string(),
        }
    }

    /// Returns the origin-less href for this location.
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }

    /// Resolves a navigation target against this location.
    ///
    /// Query-only targets (`?a=1`) keep the current pathname; fragment-only targets keep the
    /// current pathname and search.
    pub fn resolve(&self, target: &str) -> Self {
        if target.starts_with('?') {
            return Self::from_href(&format!("{}{}", self.pathname, target));
        }
        if let Some(hash) = target.strip_prefix('#') {
            return Self {
                hash: if hash.is_empty() {
                    String::new()
                } else {
                    target.to_string()
                },
                ..self.clone()
            };
        }
        Self::from_href(target)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Options accepted by [`NavigationService::navigate`].
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    #[serde(default)]
    pub replace: bool,
    /// Opaque history state attached to the entry.
    #[serde(default)]
    pub state: Option<Value>,
}

impl NavigateOptions {
    /// Options for an in-place history replacement.
    pub fn replace() -> Self {
        Self {
            replace: true,
            state: None,
        }
    }
}

/// Host service for reading and rewriting the address-bar location.
pub trait NavigationService {
    /// Returns the current location.
    fn location(&self) -> RouterLocation;

    /// Navigates to `url`, pushing or replacing the history entry per `options`.
    fn navigate(&self, url: &str, options: &NavigateOptions) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op navigation service for unsupported targets.
pub struct NoopNavigationService;

impl NavigationService for NoopNavigationService {
    fn location(&self) -> RouterLocation {
        RouterLocation::from_href("/")
    }

    fn navigate(&self, _url: &str, _options: &NavigateOptions) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A navigation recorded by [`MemoryNavigationService`].
pub struct NavigationRecord {
    /// Target as passed to [`NavigationService::navigate`].
    pub url: String,
    /// Options passed alongside the target.
    pub options: NavigateOptions,
}

#[derive(Debug, Default)]
struct MemoryHistory {
    entries: Vec<RouterLocation>,
    log: Vec<NavigationRecord>,
}

#[derive(Debug, Clone, Default)]
/// In-memory navigation service with a history stack and a log of every navigation call.
pub struct MemoryNavigationService {
    inner: Rc<RefCell<MemoryHistory>>,
}

impl MemoryNavigationService {
    /// Creates a service positioned at `href`.
    pub fn at(href: &str) -> Self {
        let service = Self::default();
        service
            .inner
            .borrow_mut()
            .entries
            .push(RouterLocation::from_href(href));
        service
    }

    /// Returns every navigation performed so far, oldest first.
    pub fn navigations(&self) -> Vec<NavigationRecord> {
        self.inner.borrow().log.clone()
    }

    /// Returns the number of history entries.
    pub fn history_len(&self) -> usize {
        self.inner.borrow().entries.len().max(1)
    }
}

impl NavigationService for MemoryNavigationService {
    fn location(&self) -> RouterLocation {
        self.inner
            .borrow()
            .entries
            .last()
            .cloned()
            .unwrap_or_else(|| RouterLocation::from_href("/"))
    }

    fn navigate(&self, url: &str, options: &NavigateOptions) -> Result<(), String> {
        let next = self.location().resolve(url);
        let mut inner = self.inner.borrow_mut();
        if options.replace && !inner.entries.is_empty() {
            inner.entries.pop();
        }
        inner.entries.push(next);
        inner.log.push(NavigationRecord {
            url: url.to_string(),
            options: options.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_href_splits_components_and_drops_origin() {
        let location = RouterLocation::from_href("https://example.test/iframe.html?id=a--b#frag");
        assert_eq!(location.pathname, "/iframe.html");
        assert_eq!(location.search, "?id=a--b");
        assert_eq!(location.hash, "#frag");
        assert_eq!(location.href(), "/iframe.html?id=a--b#frag");

        assert_eq!(RouterLocation::from_href("").pathname, "/");
        assert_eq!(RouterLocation::from_href("/?").search, "");
    }

    #[test]
    fn query_only_targets_keep_pathname() {
        let location = RouterLocation::from_href("/index.html?path=/story/a--b#x");
        let next = location.resolve("?path=/docs/a--b&args=x:1");
        assert_eq!(next.pathname, "/index.html");
        assert_eq!(next.search, "?path=/docs/a--b&args=x:1");
        assert_eq!(next.hash, "");
    }

    #[test]
    fn memory_service_replaces_or_pushes_entries() {
        let service = MemoryNavigationService::at("/?path=/story/a--b");
        let service_obj: &dyn NavigationService = &service;

        service_obj
            .navigate("?path=/story/a--c", &NavigateOptions::replace())
            .expect("replace");
        assert_eq!(service.history_len(), 1);
        assert_eq!(service_obj.location().search, "?path=/story/a--c");

        service_obj
            .navigate("/settings", &NavigateOptions::default())
            .expect("push");
        assert_eq!(service.history_len(), 2);
        assert_eq!(service_obj.location().pathname, "/settings");
        assert_eq!(service.navigations().len(), 2);
        assert!(service.navigations()[0].options.replace);
    }
}
