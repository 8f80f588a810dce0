//! Denormalized reference scanning and repair

pub mod scanner;

pub use scanner::IntegrityScanner;
