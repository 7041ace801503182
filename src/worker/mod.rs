//! Background execution and outcome delivery

pub mod deliver;
pub mod dispatcher;

pub use deliver::HttpCallbackSink;
pub use dispatcher::{Command, Dispatcher};
