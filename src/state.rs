use std::sync::Arc;

use crate::notifier::Notifier;
use crate::registry::Registry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    /// Builds the registry and notifier for a fixed set of symbols. The
    /// symbol set cannot change after this call — both are "fixed at
    /// startup" per the engine's design.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String> + Clone,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        Self {
            registry: Arc::new(Registry::new(symbols.clone())),
            notifier: Arc::new(Notifier::new(symbols)),
        }
    }
}
