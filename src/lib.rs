pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod path_de;
pub mod suite;

pub use error::{Error, Result};
pub use model::{Builder, Type};
