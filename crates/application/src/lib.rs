//! netstack application layer: ports implemented by infrastructure and the
//! use cases built on top of them.
pub mod ports;
pub mod use_cases;
