pub mod category_service;
pub mod summary_service;

pub use category_service::{CategoryAppearance, CategoryClassifier, KeywordTable};
pub use summary_service::{
    CategoryStat, DashboardSummary, MonthlyBucket, Period, PeriodTotals, Report, SummaryService,
};

use crate::errors::BudgetError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Budget(#[from] BudgetError),
    #[error("{0}")]
    Invalid(String),
}
