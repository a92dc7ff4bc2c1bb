pub mod telemetry;
pub mod types;
pub mod utils;

pub use types::*;
pub use utils::*;
