//! Test modules for the scanner system
//!
//! Manager lifecycle tests live here; filter, walk and type tests sit next
//! to their code.

pub mod helpers;
pub mod manager;
