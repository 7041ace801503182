pub mod filters;
pub mod mime;
