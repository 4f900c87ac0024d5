mod augment;
mod error;
mod geometry;
mod record;
mod symmetry;
mod takbin;

pub use augment::*;
pub use error::*;
pub use geometry::*;
pub use record::*;
pub use symmetry::*;
pub use takbin::*;
