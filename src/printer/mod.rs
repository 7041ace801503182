//! Cloud printer submission

pub mod epson;

pub use epson::EpsonConnectClient;
