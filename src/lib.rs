pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod report;
pub mod transform;

pub use config::Config;
pub use datasource::{DataSource, DataSourceError, GraphQlDataSource, MockDataSource};
pub use domain::{
    Account, CalculationConfig, Decimal, LiquidityRecord, LiquiditySnapshot, PointResult, TimeSec,
    TradingSnapshot, UserRecord,
};
pub use engine::{aggregate, integrate};
pub use error::AppError;
pub use orchestration::PointsPipeline;
