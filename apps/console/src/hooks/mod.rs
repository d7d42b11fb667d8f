pub mod query;
pub mod remote;
pub mod screen;
pub mod search;
