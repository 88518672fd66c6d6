use crate::error::resource::ResourceError;
use crate::resource::ResourceProvider;

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, trace};

#[derive(Debug)]
struct MountEntry {
    prefix: String,
    /// Most recently mounted first.
    providers: Vec<Arc<ResourceProvider>>,
}

/// Provider and physical path a request path resolved to.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub provider: Arc<ResourceProvider>,
    pub physical_path: String,
    pub prefix: String,
}

/// URL prefix → provider overlay table.
///
/// Prefixes are kept sorted by length, longest first. Once a prefix matches a
/// request, only that prefix's providers are consulted; a miss there is final
/// and shorter prefixes are never tried.
#[derive(Debug, Default)]
pub struct MountRegistry {
    entries: RwLock<Vec<MountEntry>>,
}

impl MountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `provider` over whatever is already mounted at `prefix`.
    pub fn mount(&self, prefix: impl Into<String>, provider: ResourceProvider) {
        let prefix = prefix.into();
        let kind = provider.kind();
        let provider = Arc::new(provider);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.iter_mut().find(|entry| entry.prefix == prefix) {
            Some(entry) => entry.providers.insert(0, provider),
            None => {
                entries.push(MountEntry {
                    prefix: prefix.clone(),
                    providers: vec![provider],
                });
                // Stable: equal-length prefixes keep their mount order.
                entries.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
            }
        }

        info!("Mounted {kind} provider at '{prefix}'");
    }

    pub fn resolve(&self, request_path: &str) -> Result<Resolved, ResourceError> {
        let (prefix, providers) = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries
                .iter()
                .find(|entry| request_path.starts_with(entry.prefix.as_str()))
            {
                Some(entry) => (entry.prefix.clone(), entry.providers.clone()),
                None => {
                    debug!("No mount prefix matches '{request_path}'");
                    return Err(ResourceError::not_found(request_path));
                }
            }
        };

        let logical = &request_path[prefix.len()..];
        for provider in providers {
            let physical_path = provider.transform_path(logical);
            if provider.exists(&physical_path) {
                trace!(
                    "Resolved '{request_path}' via {} provider under '{prefix}'",
                    provider.kind()
                );
                return Ok(Resolved {
                    provider,
                    physical_path,
                    prefix,
                });
            }
        }

        debug!("No provider under '{prefix}' has '{request_path}'");
        Err(ResourceError::not_found(request_path))
    }

    /// Prefixes in trial order.
    pub fn prefixes(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|entry| entry.prefix.clone())
            .collect()
    }
}
