//! Domain Layer
//!
//! The engine talks to the outside world only through the traits in `ports/`.
//! `infrastructure/` provides the concrete implementations.

pub mod ports;
