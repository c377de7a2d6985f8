pub mod batch;
pub mod calculator;
pub mod products;
pub mod sanity;

pub use batch::{BatchEvaluator, BatchOutput, BatchRow, BATCH_COLUMNS};
pub use calculator::{CalculatorConfig, VolumeCalculator};
pub use products::{ProductClass, ProductTable};
pub use sanity::{cone_volume, SanityGuard};
