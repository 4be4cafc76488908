//! Query logging and search statistics for CineScope.
//!
//! [`Reporting`] is the only entry point presentation code uses. It composes a
//! [`QueryLogger`] and a [`StatisticsAggregator`] over one [`EventStore`]
//! handle and absorbs every store fault: writes that fail yield no event id,
//! reads that fail yield empty results.
//!
//! [`EventStore`]: cinescope_core::store::EventStore

mod aggregator;
mod limits;
mod logger;
mod reporting;

pub use aggregator::StatisticsAggregator;
pub use limits::ReportLimits;
pub use logger::QueryLogger;
pub use reporting::Reporting;
