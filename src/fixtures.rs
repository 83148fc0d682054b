#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use serde_json::Value;

    use crate::error::ProviderError;
    use crate::provider::{Provider, ProviderContext};

    /// Counts calls to a provider's `get`.
    #[derive(Clone, Default)]
    pub struct CallCounter(Arc<AtomicUsize>);

    impl CallCounter {
        pub fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }

        fn bump(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A provider answering from a fixed map.
    pub struct StaticProvider {
        priority: i32,
        description: String,
        values: HashMap<String, Value>,
        calls: CallCounter,
    }

    impl StaticProvider {
        pub fn new(priority: i32, description: &str, pairs: &[(&str, Value)]) -> Self {
            Self {
                priority,
                description: description.to_string(),
                values: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                calls: CallCounter::default(),
            }
        }

        pub fn calls(&self) -> CallCounter {
            self.calls.clone()
        }
    }

    impl Provider for StaticProvider {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn description(&self) -> &str {
            &self.description
        }

        fn get(&self, key: &str, _ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
            self.calls.bump();
            Ok(self.values.get(key).cloned())
        }
    }

    /// A provider whose backing map can be changed after registration.
    pub struct SharedSource {
        priority: i32,
        values: Arc<Mutex<HashMap<String, Value>>>,
    }

    #[derive(Clone)]
    pub struct SourceHandle(Arc<Mutex<HashMap<String, Value>>>);

    impl SourceHandle {
        pub fn set(&self, key: &str, value: Value) {
            self.0.lock().insert(key.to_string(), value);
        }
    }

    impl SharedSource {
        pub fn new(priority: i32) -> Self {
            Self {
                priority,
                values: Arc::default(),
            }
        }

        pub fn handle(&self) -> SourceHandle {
            SourceHandle(self.values.clone())
        }
    }

    impl Provider for SharedSource {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn description(&self) -> &str {
            "shared test source"
        }

        fn get(&self, key: &str, _ctx: &ProviderContext<'_>) -> Result<Option<Value>, ProviderError> {
            Ok(self.values.lock().get(key).cloned())
        }
    }

    /// Synthetic environment pairs.
    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Synthetic argv, program name first.
    pub fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("app")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn static_provider_counts_calls() {
        let provider = StaticProvider::new(1, "s", &[]);
        let calls = provider.calls();
        assert_eq!(calls.get(), 0);
        provider.calls.bump();
        assert_eq!(calls.get(), 1);
    }
}
