use crate::calculator::{Calculator, SimpleCalculator};
use crate::error::FactoryError;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// Builds a fresh calculator instance.
pub type CalculatorConstructor = fn() -> Box<dyn Calculator>;

/// Maps calculator kinds to their constructors.
pub struct CalculatorRegistry {
    constructors: HashMap<String, CalculatorConstructor>,
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(SimpleCalculator::KIND, || Box::new(SimpleCalculator::new()));
        registry
    }
}

impl CalculatorRegistry {
    /// Registry with the built-in kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self { constructors: HashMap::new() }
    }

    pub fn register(&mut self, kind: &str, constructor: CalculatorConstructor) {
        self.constructors.insert(kind.to_string(), constructor);
    }

    /// Constructs a new, independent calculator of `kind`.
    pub fn create(&self, kind: &str) -> Result<Box<dyn Calculator>, FactoryError> {
        let constructor = self
            .constructors
            .get(kind)
            .ok_or_else(|| FactoryError::UnknownCalculatorKind { kind: kind.to_string() })?;
        debug!(kind, "creating calculator");
        Ok(constructor())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.constructors.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

/// Global calculator registry - populated on first use
static DEFAULT_REGISTRY: LazyLock<CalculatorRegistry> = LazyLock::new(CalculatorRegistry::default);

/// Factory entry point over the built-in registry.
pub struct Calculators;

impl Calculators {
    /// Returns a new calculator of the given kind, e.g. `"simple"`.
    pub fn get_calculator(kind: &str) -> Result<Box<dyn Calculator>, FactoryError> {
        DEFAULT_REGISTRY.create(kind)
    }

    /// Kinds understood by [`Calculators::get_calculator`].
    pub fn kinds() -> Vec<String> {
        DEFAULT_REGISTRY.kinds()
    }
}
