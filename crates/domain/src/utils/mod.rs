//! Pure helpers with no I/O

pub mod money;
pub mod romanize;
