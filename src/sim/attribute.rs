//! Derived character stats with memoization
//!
//! An attribute folds its base contributors left-to-right into a sum
//! (starting at 0) and its multiplier contributors into a product (starting
//! at 1), then multiplies the two. The result depends only on the contributor
//! lists and the character level, so it is cached until either changes.
//! Every push bumps a generation counter; the cache remembers the generation
//! and level it was computed for.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// Custom contributor: (accumulator, level) -> new accumulator
pub type ContributorFn = Arc<dyn Fn(f32, u32) -> f32 + Send + Sync>;

/// One step of an attribute fold
#[derive(Clone)]
pub enum Contributor {
    /// `acc + amount`
    Add(f32),
    /// `acc * factor`
    Scale(f32),
    /// `acc + amount * level`
    PerLevel(f32),
    /// Arbitrary function of the accumulator and level
    Custom(ContributorFn),
}

impl Contributor {
    /// Wrap a closure as a contributor
    pub fn custom(f: impl Fn(f32, u32) -> f32 + Send + Sync + 'static) -> Self {
        Contributor::Custom(Arc::new(f))
    }

    #[inline]
    pub fn apply(&self, acc: f32, level: u32) -> f32 {
        match self {
            Contributor::Add(amount) => acc + amount,
            Contributor::Scale(factor) => acc * factor,
            Contributor::PerLevel(amount) => acc + amount * level as f32,
            Contributor::Custom(f) => f(acc, level),
        }
    }
}

impl fmt::Debug for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contributor::Add(a) => write!(f, "Add({a})"),
            Contributor::Scale(s) => write!(f, "Scale({s})"),
            Contributor::PerLevel(a) => write!(f, "PerLevel({a})"),
            Contributor::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedValue {
    generation: u64,
    level: u32,
    value: f32,
}

/// A memoized derived stat
#[derive(Debug, Clone)]
pub struct Attribute {
    base: Vec<Contributor>,
    multiplier: Vec<Contributor>,
    generation: u64,
    cache: Cell<Option<CachedValue>>,
}

impl Attribute {
    /// Attribute with a single constant base contribution
    pub fn new(base: f32) -> Self {
        Self::with_contributors(vec![Contributor::Add(base)], Vec::new())
    }

    pub fn with_contributors(base: Vec<Contributor>, multiplier: Vec<Contributor>) -> Self {
        Self {
            base,
            multiplier,
            generation: 0,
            cache: Cell::new(None),
        }
    }

    /// Current value at the given character level
    pub fn value(&self, level: u32) -> f32 {
        if let Some(cached) = self.cache.get() {
            if cached.generation == self.generation && cached.level == level {
                return cached.value;
            }
        }

        let sum = self.base.iter().fold(0.0, |acc, c| c.apply(acc, level));
        let product = self.multiplier.iter().fold(1.0, |acc, c| c.apply(acc, level));
        let value = sum * product;

        self.cache.set(Some(CachedValue {
            generation: self.generation,
            level,
            value,
        }));
        value
    }

    pub fn add_base(&mut self, contributor: Contributor) {
        self.base.push(contributor);
        self.generation += 1;
    }

    pub fn add_multiplier(&mut self, contributor: Contributor) {
        self.multiplier.push(contributor);
        self.generation += 1;
    }

    /// Mutation counter; changes whenever a contributor is added
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn base_contributors(&self) -> &[Contributor] {
        &self.base
    }

    pub fn multiplier_contributors(&self) -> &[Contributor] {
        &self.multiplier
    }
}
