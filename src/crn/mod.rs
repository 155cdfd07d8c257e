//! 化学反应网络：模块、组合与展开。

mod composition;
mod error;
mod flatten;
mod module;
pub mod rate;
mod registry;
mod species;

pub use composition::{Composition, Expansion};
pub use error::Error;
pub use flatten::Flattener;
pub use module::Module;
pub use rate::Rate;
pub use registry::ModuleRegistry;
pub use species::{Reaction, Species, Term};
