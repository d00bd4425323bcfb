//! Data exchanged with the comparison service

pub mod comparison;
pub mod embedding;
