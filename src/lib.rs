pub mod calc;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod models;
pub mod report;

pub use calc::{
    BatchEvaluator, BatchOutput, BatchRow, CalculatorConfig, ProductClass, ProductTable,
    SanityGuard, VolumeCalculator,
};
pub use config::CruiseConfig;
pub use engine::{
    EquationLookup, ProfileEngine, StaticEquationTable, VolumeEngine, VolumeEngineAdapter,
};
pub use error::VolumeError;
pub use models::{
    CalcMode, LogSegment, MerchRules, ProductSummary, RawVolumeResult, TreeInput,
    TreeVolumeResult,
};
