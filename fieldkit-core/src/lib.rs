pub mod context;
pub mod error;
pub mod field;
pub mod force;
pub mod grid;
pub mod lookup;
pub mod record;
pub mod sampler;
pub mod scale;
pub mod sources;
pub mod sum;
pub mod table;
pub mod timing;

pub use context::{Context, Species, SpeciesDb, SpeciesTable};
pub use error::{FieldError, RecordError, TableError};
pub use field::{BgField, Field, Magnitude};
pub use force::{derivs, Force, Null, Particle};
pub use grid::{create_field_file, sample_table, GridSpec};
pub use lookup::ForceLookup;
pub use record::Record;
pub use sampler::TableSampler;
pub use scale::Scale;
pub use sources::{ConstantField, Gravity, G_EARTH};
pub use sum::{Add, Sum};
pub use table::{FieldTable, Region};
pub use timing::{Envelope, Segment, Shape, Timing};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
