pub mod cache_store;
pub mod clock;
pub mod content;
pub mod dashboard;
pub mod github_sync;
pub mod source_hosting;
pub mod sync_scheduler;
