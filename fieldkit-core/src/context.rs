//! Evaluation context: a borrowed view of the species property database
//!
//! Sources composed together share one context type. The database itself is
//! owned elsewhere; a context only borrows it.

use crate::error::FieldError;
use std::fmt;

/// Read-only, indexed access to per-species properties
pub trait SpeciesDb {
    /// Mass of the given species, if it exists
    fn mass(&self, species: usize) -> Option<f64>;

    /// Number of species in the database
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One species entry of a [`SpeciesTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub name: String,
    pub mass: f64,
}

/// A small in-memory species database
#[derive(Debug, Clone, Default)]
pub struct SpeciesTable {
    pub species: Vec<Species>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self {
            species: Vec::new(),
        }
    }

    /// Append a species and return its index
    pub fn add(&mut self, name: impl Into<String>, mass: f64) -> usize {
        let idx = self.species.len();
        self.species.push(Species {
            name: name.into(),
            mass,
        });
        idx
    }

    /// Find the index of a species by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }
}

impl SpeciesDb for SpeciesTable {
    fn mass(&self, species: usize) -> Option<f64> {
        self.species.get(species).map(|s| s.mass)
    }

    fn len(&self) -> usize {
        self.species.len()
    }
}

/// Non-owning reference to a species database, copied into every source
pub struct Context<'db, D: ?Sized = SpeciesTable> {
    db: Option<&'db D>,
}

impl<'db, D: ?Sized> Context<'db, D> {
    pub fn new(db: &'db D) -> Self {
        Self { db: Some(db) }
    }

    /// A context with no database attached
    pub fn unbound() -> Self {
        Self { db: None }
    }

    pub fn db(&self) -> Option<&'db D> {
        self.db
    }

    pub fn is_bound(&self) -> bool {
        self.db.is_some()
    }
}

impl<'db, D: SpeciesDb + ?Sized> Context<'db, D> {
    /// Mass of a species from the bound database
    pub fn mass(&self, species: usize) -> Result<f64, FieldError> {
        let db = self.db.ok_or(FieldError::MissingDatabase)?;
        db.mass(species).ok_or(FieldError::UnknownSpecies {
            species,
            count: db.len(),
        })
    }
}

// Manual impls: the context is a reference, so it is Copy whatever D is.
impl<D: ?Sized> Clone for Context<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for Context<'_, D> {}

impl<D: ?Sized> Default for Context<'_, D> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<D: ?Sized> fmt::Debug for Context<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bound", &self.db.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_context_reports_missing_database() {
        let ctx: Context<'_, SpeciesTable> = Context::default();
        assert!(!ctx.is_bound());
        assert_eq!(ctx.mass(0), Err(FieldError::MissingDatabase));
    }

    #[test]
    fn test_bound_context_reads_mass() {
        let mut db = SpeciesTable::new();
        let rb = db.add("87Rb", 1.44e-25);
        let ctx = Context::new(&db);
        assert_eq!(ctx.mass(rb), Ok(1.44e-25));
        assert_eq!(db.index_of("87Rb"), Some(0));
    }

    #[test]
    fn test_unknown_species() {
        let mut db = SpeciesTable::new();
        db.add("e", 9.109e-31);
        let ctx = Context::new(&db);
        assert_eq!(
            ctx.mass(3),
            Err(FieldError::UnknownSpecies {
                species: 3,
                count: 1
            })
        );
    }

    #[test]
    fn test_context_copies_share_database() {
        let mut db = SpeciesTable::new();
        db.add("a", 2.0);
        let ctx = Context::new(&db);
        let copy = ctx;
        assert_eq!(copy.mass(0), ctx.mass(0));
    }
}
