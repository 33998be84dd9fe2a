//! Owner of the default and named configuration sources.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::defaults::DEFAULT_CONFIG_FILE;
use crate::section::ConfigSection;
use crate::source::ConfigSource;

const STORE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::store");

/// Hands out configuration sources by name.
///
/// The default source answers requests without a name and requests for
/// [`DEFAULT_CONFIG_FILE`]. Any other name is served from the registered
/// sources, or loaded as a YAML file relative to the data directory on first
/// use. Loaded files are cached for the lifetime of the store; a file that is
/// missing or malformed behaves as an empty section.
pub struct ConfigStore {
    data_dir: Option<PathBuf>,
    default_source: Arc<dyn ConfigSource>,
    named: Mutex<HashMap<String, Arc<dyn ConfigSource>>>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("data_dir", &self.data_dir)
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Creates a store with an explicit default source and no data directory.
    ///
    /// Named sources must be registered with [`ConfigStore::with_source`];
    /// unknown names resolve to an empty section.
    #[must_use]
    pub fn new(default_source: Arc<dyn ConfigSource>) -> Self {
        Self {
            data_dir: None,
            default_source,
            named: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a store backed by YAML files in `data_dir`.
    ///
    /// The default source is read from `data_dir/config.yml`.
    #[must_use]
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let dir = data_dir.into();
        let default_source = load_or_empty(&dir.join(DEFAULT_CONFIG_FILE));
        Self {
            data_dir: Some(dir),
            default_source,
            named: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a named source ahead of any file lookup.
    #[must_use]
    pub fn with_source(self, name: impl Into<String>, source: Arc<dyn ConfigSource>) -> Self {
        self.named
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), source);
        self
    }

    /// Directory named sources are loaded from, if any.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Returns the default source.
    #[must_use]
    pub fn default_source(&self) -> Arc<dyn ConfigSource> {
        Arc::clone(&self.default_source)
    }

    /// Returns the source for `name`, or the default source for `None`.
    #[must_use]
    pub fn source(&self, name: Option<&str>) -> Arc<dyn ConfigSource> {
        match name {
            None => self.default_source(),
            Some(file) if is_default_name(file) => self.default_source(),
            Some(file) => self.named_source(file),
        }
    }

    /// Returns the named source, loading and caching it on first use.
    #[must_use]
    pub fn named_source(&self, name: &str) -> Arc<dyn ConfigSource> {
        let mut named = self.named.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(source) = named.get(name) {
            return Arc::clone(source);
        }
        let loaded = self.data_dir.as_ref().map_or_else(
            || {
                debug!(target: STORE_TARGET, file = name, "no data directory; using empty section");
                empty_source()
            },
            |dir| load_or_empty(&dir.join(name)),
        );
        named.insert(name.to_owned(), Arc::clone(&loaded));
        loaded
    }

    /// Number of named sources currently cached or registered.
    #[must_use]
    pub fn cached_sources(&self) -> usize {
        self.named
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn is_default_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(DEFAULT_CONFIG_FILE)
}

fn empty_source() -> Arc<dyn ConfigSource> {
    Arc::new(ConfigSection::new())
}

fn load_or_empty(path: &Path) -> Arc<dyn ConfigSource> {
    match ConfigSection::load(path) {
        Ok(section) => {
            debug!(
                target: STORE_TARGET,
                path = %path.display(),
                keys = section.len(),
                "loaded configuration file"
            );
            Arc::new(section)
        }
        Err(err) if err.is_missing_file() => {
            debug!(target: STORE_TARGET, path = %path.display(), "configuration file not found");
            empty_source()
        }
        Err(err) => {
            warn!(
                target: STORE_TARGET,
                path = %path.display(),
                error = %err,
                "configuration file unusable; using empty section"
            );
            empty_source()
        }
    }
}
