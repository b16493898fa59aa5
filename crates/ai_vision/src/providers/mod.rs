//! Vision service clients

pub mod ascii;
pub mod azure;
