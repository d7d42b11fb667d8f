pub mod filters;
pub mod panels;
pub mod screen;
pub mod shell;
