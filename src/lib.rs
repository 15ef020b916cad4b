pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod orbital;
pub mod sim;

pub use catalog::{BodyKind, Catalog, CatalogBuilder, CatalogEntry};
pub use config::OrreryConfig;
pub use error::{OrreryError, Result};
pub use orbital::{propagate, OrbitalElements, DISPLAY_SCALE};
pub use sim::{run, BodyRegistry, BodySink, FrameDriver};
