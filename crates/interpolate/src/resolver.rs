use std::{
    collections::{BTreeMap, HashMap},
    env,
    hash::BuildHasher,
};

/// Maps a variable name to its bound value, or `None` when unbound.
///
/// Lookups must be free of observable side effects: the engine may be run
/// repeatedly over the same input and expects the same answers.
pub trait Resolver {
    fn resolve(&self, name: &str) -> Option<String>;

    /// Consult `self` first, falling back to `fallback` for unbound names.
    fn or<B: Resolver>(self, fallback: B) -> Or<Self, B>
    where
        Self: Sized,
    {
        Or {
            first: self,
            fallback,
        }
    }
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl<S: BuildHasher> Resolver for HashMap<String, String, S> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Resolver for BTreeMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Process environment. Values that are not valid Unicode count as unbound.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvResolver;

impl Resolver for EnvResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// Layered lookup built by [`Resolver::or`]; the first binding wins.
#[derive(Debug, Clone)]
pub struct Or<A, B> {
    first: A,
    fallback: B,
}

impl<A: Resolver, B: Resolver> Resolver for Or<A, B> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.first
            .resolve(name)
            .or_else(|| self.fallback.resolve(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn closures_resolve() {
        let resolver = |name: &str| (name == "A").then(|| "1".to_string());
        assert_eq!(resolver.resolve("A").as_deref(), Some("1"));
        assert_eq!(resolver.resolve("B"), None);
    }

    #[test]
    fn maps_resolve() {
        let vars = map(&[("A", "1"), ("EMPTY", "")]);
        assert_eq!(vars.resolve("A").as_deref(), Some("1"));
        assert_eq!(vars.resolve("EMPTY").as_deref(), Some(""));
        assert_eq!(vars.resolve("missing"), None);
    }

    #[test]
    fn first_binding_wins() {
        let layered = map(&[("A", "override")]).or(map(&[("A", "base"), ("B", "base")]));
        assert_eq!(layered.resolve("A").as_deref(), Some("override"));
        assert_eq!(layered.resolve("B").as_deref(), Some("base"));
        assert_eq!(layered.resolve("C"), None);
    }

    #[test]
    fn boxed_trait_objects_resolve() {
        let boxed: Box<dyn Resolver> = Box::new(map(&[("A", "1")]));
        assert_eq!(boxed.resolve("A").as_deref(), Some("1"));
    }

    #[test]
    fn env_resolver_reads_process_environment() {
        // Cargo sets this for every test binary it runs.
        assert!(EnvResolver.resolve("CARGO_PKG_NAME").is_some());
        assert_eq!(EnvResolver.resolve("ENVINTERP_SURELY_UNSET_1F2E3D"), None);
    }
}
