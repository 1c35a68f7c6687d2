pub mod aggregator;
pub mod fallback;
pub mod studio_db;

pub use aggregator::AggregatorAdapter;
pub use fallback::FallbackWikiAdapter;
pub use studio_db::StudioDbAdapter;
