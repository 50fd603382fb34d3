//! Context registry
//!
//!     Maps context names to factories. Factories are registered under qualified names
//!     (`arith::Expression`) and looked up through an ordered list of namespaces: asking
//!     for `Expression` tries `<namespace><separator>Expression` for each namespace in
//!     registration order, and the first registered name wins. The empty namespace
//!     stands for unqualified names. With no namespace registered, names are looked up
//!     as given.

use crate::parsec::config::RegistryConfig;
use crate::parsec::context::{Context, ContextState, Dispatch};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

pub const DEFAULT_SEPARATOR: &str = "::";

/// Builds a context from the state prepared by the parser
pub type ContextFactory<V> = Rc<dyn Fn(ContextState<V>) -> Box<dyn Dispatch<V>>>;

pub struct ContextRegistry<V> {
    namespaces: Vec<String>,
    separator: String,
    factories: HashMap<String, ContextFactory<V>>,
}

impl<V> ContextRegistry<V> {
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            factories: HashMap::new(),
        }
    }

    /// Separator and namespaces from configuration; factories still have to be registered
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::new();
        registry.set_namespace_separator(&config.namespace_separator);
        registry.set_namespaces(&config.namespaces);
        registry
    }

    /// Register a factory under a qualified name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(ContextState<V>) -> Box<dyn Dispatch<V>> + 'static,
    {
        let name = name.into();
        debug!(target: "parsec::registry", context = %name, "Registered context");
        self.factories.insert(name, Rc::new(factory));
        self
    }

    /// Register a [`Context`] type under a qualified name
    pub fn register_context<C>(&mut self, name: impl Into<String>) -> &mut Self
    where
        C: Context<V>,
        V: Default + 'static,
    {
        self.register(name, |state| Box::new(C::create(state)) as Box<dyn Dispatch<V>>)
    }

    /// Append a namespace; the separator is trimmed from both ends
    pub fn add_namespace(&mut self, namespace: &str) -> &mut Self {
        let trimmed = if self.separator.is_empty() {
            namespace
        } else {
            namespace
                .trim_start_matches(self.separator.as_str())
                .trim_end_matches(self.separator.as_str())
        };
        self.namespaces.push(trimmed.to_string());
        self
    }

    /// Replace all namespaces
    pub fn set_namespaces<S: AsRef<str>>(&mut self, namespaces: &[S]) -> &mut Self {
        self.namespaces.clear();
        for namespace in namespaces {
            self.add_namespace(namespace.as_ref());
        }
        self
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn set_namespace_separator(&mut self, separator: &str) -> &mut Self {
        self.separator = separator.to_string();
        self
    }

    pub fn namespace_separator(&self) -> &str {
        &self.separator
    }

    /// Names tried for `name`, in resolution order
    pub fn candidates(&self, name: &str) -> Vec<String> {
        if self.namespaces.is_empty() {
            return vec![name.to_string()];
        }
        self.namespaces
            .iter()
            .map(|namespace| {
                if namespace.is_empty() {
                    name.to_string()
                } else {
                    format!("{}{}{}", namespace, self.separator, name)
                }
            })
            .collect()
    }

    /// The factory for the first candidate that is registered
    pub fn resolve(&self, name: &str) -> Option<ContextFactory<V>> {
        let found = self
            .candidates(name)
            .into_iter()
            .find_map(|candidate| self.factories.get(&candidate).map(|f| (candidate, f)));

        match found {
            Some((qualified, factory)) => {
                trace!(target: "parsec::registry", context = name, %qualified, "Resolved context");
                Some(Rc::clone(factory))
            }
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<V> Default for ContextRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ContextRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ContextRegistry")
            .field("namespaces", &self.namespaces)
            .field("separator", &self.separator)
            .field("contexts", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsec::context::{HandlerTable, Params};
    use once_cell::sync::Lazy;

    struct Fake {
        state: ContextState<u32>,
    }

    impl Context<u32> for Fake {
        fn create(state: ContextState<u32>) -> Self {
            Fake { state }
        }

        fn state(&self) -> &ContextState<u32> {
            &self.state
        }

        fn state_mut(&mut self) -> &mut ContextState<u32> {
            &mut self.state
        }

        fn handlers() -> &'static HandlerTable<Self, u32> {
            static HANDLERS: Lazy<HandlerTable<Fake, u32>> = Lazy::new(HandlerTable::new);
            &HANDLERS
        }
    }

    fn returning(value: u32) -> impl Fn(ContextState<u32>) -> Box<dyn Dispatch<u32>> {
        move |state| {
            Box::new(Fake::create(state.with_default_exit_value(value))) as Box<dyn Dispatch<u32>>
        }
    }

    fn build(registry: &ContextRegistry<u32>, name: &str) -> Option<u32> {
        let factory = registry.resolve(name)?;
        let context = factory(ContextState::new(name, Params::new()));
        Some(context.into_exit_value())
    }

    #[test]
    fn test_namespaces() {
        let mut registry = ContextRegistry::<u32>::new();
        registry.add_namespace("parsec::tests");
        assert_eq!(registry.namespaces(), ["parsec::tests"]);

        let mut registry = ContextRegistry::<u32>::new();
        registry.set_namespace_separator("_");
        registry.add_namespace("Parsec_Tests_");
        assert_eq!(registry.namespaces(), ["Parsec_Tests"]);
        assert_eq!(registry.namespace_separator(), "_");
    }

    #[test]
    fn test_resolve_through_namespace() {
        let mut registry = ContextRegistry::<u32>::new();
        registry
            .register("tests::FakeContext", returning(7))
            .add_namespace("tests");

        assert_eq!(build(&registry, "FakeContext"), Some(7));
        assert_eq!(build(&registry, "tests::FakeContext"), None);
        assert!(registry.contains("FakeContext"));
        assert!(!registry.contains("Missing"));
    }

    #[test]
    fn test_first_namespace_wins() {
        let mut registry = ContextRegistry::<u32>::new();
        registry.register("b::Ctx", returning(2));
        registry.register("a::Ctx", returning(1));

        registry.set_namespaces(&["a", "b"]);
        assert_eq!(build(&registry, "Ctx"), Some(1));

        registry.set_namespaces(&["missing", "b", "a"]);
        assert_eq!(build(&registry, "Ctx"), Some(2));
    }

    #[test]
    fn test_empty_namespace_means_unqualified() {
        let mut registry = ContextRegistry::<u32>::new();
        registry.register_context::<Fake>("Expression");
        registry.add_namespace("::");
        assert_eq!(build(&registry, "Expression"), Some(0));

        assert_eq!(registry.namespaces(), [""]);
        assert_eq!(registry.candidates("Expression"), vec!["Expression"]);
        assert!(registry.contains("Expression"));
    }

    #[test]
    fn test_without_namespaces_names_are_used_as_given() {
        let mut registry = ContextRegistry::<u32>::new();
        registry.register_context::<Fake>("Expression");
        assert!(registry.contains("Expression"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = RegistryConfig {
            namespace_separator: ".".to_string(),
            namespaces: vec!["grammar.".to_string(), "common".to_string()],
        };
        let registry = ContextRegistry::<u32>::from_config(&config);
        assert_eq!(registry.namespace_separator(), ".");
        assert_eq!(registry.namespaces(), ["grammar", "common"]);
        assert_eq!(
            registry.candidates("Expr"),
            vec!["grammar.Expr", "common.Expr"]
        );
    }
}
