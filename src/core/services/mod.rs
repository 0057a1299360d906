pub mod search_service;
pub mod summary_service;

pub use search_service::SearchService;
pub use summary_service::SummaryService;
