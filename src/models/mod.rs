pub mod devlog_post;
pub mod project;
pub mod repo_activity_point;
pub mod repo_snapshot;
pub mod user_contribution_day;
