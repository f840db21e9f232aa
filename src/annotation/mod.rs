pub mod builder;
pub mod io;

pub use builder::{AnnotationBuilder, GeneTable};
pub use io::{ParseError, TableReader};
