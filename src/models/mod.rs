pub mod day_summary;
pub mod event;
pub mod event_kind;
pub mod identity;
pub mod policy;
pub mod session;
pub mod status;
