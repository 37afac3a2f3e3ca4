mod counts;
mod details;
mod filters;
mod latest;
mod statistics;

pub use counts::NodeCountPanel;
pub use details::NodeDetailsPanel;
pub use filters::FilterBar;
pub use latest::LatestNodesPanel;
pub use statistics::StatisticsPanel;
