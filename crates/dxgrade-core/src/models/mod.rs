//! Domain models for the dxgrade system.

mod case;
mod consistency;
mod pathology;
mod rules;
mod score;

pub use case::*;
pub use consistency::*;
pub use pathology::*;
pub use rules::*;
pub use score::*;
