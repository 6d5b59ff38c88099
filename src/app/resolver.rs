use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::adapters::process_runner::DEFAULT_COMMAND_TIMEOUT;
use crate::adapters::MacSystemSource;
use crate::domain::{
    parse_model_identifier, AtomicResolverState, MacType, ModelCatalog, ModelRecord,
    ResolvedModel, ResolverState, PREFERENCES_PROBE_EXEMPT_IDENTIFIER,
};
use crate::ports::SystemIdentifierSource;

/// Process-wide resolver over the real system probes.
static INSTANCE: OnceCell<ModelResolver> = OnceCell::new();

/// Turns the machine's model identifier into a product name and display size.
///
/// Resolution runs at most once. The first caller moves the resolver from
/// `Uninitialized` through `Resolving` to `Resolved` while holding the
/// transition lock; concurrent callers wait on that lock and then read the
/// snapshot. Once resolved, reads go through the `OnceCell` without locking.
pub struct ModelResolver {
    source: Arc<dyn SystemIdentifierSource>,
    catalog: ModelCatalog,
    transition: Mutex<()>,
    state: AtomicResolverState,
    resolved: OnceCell<ResolvedModel>,
}

impl ModelResolver {
    pub fn new(source: Arc<dyn SystemIdentifierSource>, catalog: ModelCatalog) -> Self {
        Self {
            source,
            catalog,
            transition: Mutex::new(()),
            state: AtomicResolverState::default(),
            resolved: OnceCell::new(),
        }
    }

    /// Create a resolver over the embedded catalog.
    pub fn with_builtin_catalog(source: Arc<dyn SystemIdentifierSource>) -> Self {
        Self::new(source, ModelCatalog::builtin())
    }

    /// Get the global resolver, creating it with the default command timeout if needed.
    pub fn global() -> &'static ModelResolver {
        Self::init_global(DEFAULT_COMMAND_TIMEOUT)
    }

    /// Get the global resolver, creating it with `timeout` if it does not exist yet.
    ///
    /// The timeout is ignored once the global resolver has been created.
    pub fn init_global(timeout: Duration) -> &'static ModelResolver {
        INSTANCE.get_or_init(|| {
            Self::with_builtin_catalog(Arc::new(MacSystemSource::with_timeout(timeout)))
        })
    }

    /// Resolve the model, running the probes on the first call only.
    pub fn resolve(&self) -> ResolvedModel {
        if let Some(model) = self.resolved.get() {
            return model.clone();
        }

        let _guard = self.transition.lock();
        // Another caller may have finished while we waited for the lock.
        if let Some(model) = self.resolved.get() {
            return model.clone();
        }

        self.state.store(ResolverState::Resolving);
        debug!("Initializing Mac model info");

        let model = self.resolved.get_or_init(|| self.compute()).clone();
        self.state.store(ResolverState::Resolved);

        info!(
            identifier = %model.identifier,
            product_name = %model.product_name,
            display_size_inches = model.display_size_inches,
            mac_type = %model.mac_type,
            "Mac model resolved"
        );
        model
    }

    /// Human-readable product name.
    pub fn product_name(&self) -> String {
        self.resolve().product_name
    }

    /// Built-in display size in inches, 0 when the model has none.
    pub fn display_size_inches(&self) -> f32 {
        self.resolve().display_size_inches
    }

    /// Canonical model identifier (e.g., "MacBookPro16,1" or "Unknown").
    pub fn model_identifier(&self) -> String {
        self.resolve().identifier
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Current lifecycle state. Never blocks.
    pub fn state(&self) -> ResolverState {
        // The snapshot is published before the state flips to Resolved.
        if self.is_resolved() {
            return ResolverState::Resolved;
        }
        self.state.load()
    }

    fn compute(&self) -> ResolvedModel {
        let identifier = match self.source.raw_model_identifier() {
            Some(raw) => {
                let id = parse_model_identifier(&raw);
                debug!(raw = %raw.trim(), parsed = %id, "Parsed model identifier");
                id
            }
            None => parse_model_identifier(""),
        };

        let record = self
            .catalog
            .lookup(&identifier)
            .cloned()
            .unwrap_or_else(|| ModelRecord::generic(identifier.clone()));
        debug!(
            identifier = %identifier,
            display_size_inches = record.display_size_inches,
            product_name = %record.product_name,
            "Catalog lookup"
        );

        let product_name = self.refine_name(&identifier, &record);
        let mac_type = MacType::classify(&identifier, &product_name);

        // Probes only ever refine the name; the display size is the catalog's.
        ResolvedModel {
            identifier,
            product_name,
            display_size_inches: record.display_size_inches,
            mac_type,
        }
    }

    /// Pick the probe for this record and let it override the catalog name.
    ///
    /// Generic names are refined from System Profiler's preferences, except
    /// for MacPro7,1, which like every named model goes to the hardware file.
    fn refine_name(&self, identifier: &str, record: &ModelRecord) -> String {
        let probed = if record.is_generic() && identifier != PREFERENCES_PROBE_EXEMPT_IDENTIFIER {
            debug!("Generic catalog name, consulting System Profiler preferences");
            self.source.cpu_name_fallback()
        } else {
            self.source.hardware_file_model_line()
        };

        probed
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| record.product_name.clone())
    }
}
