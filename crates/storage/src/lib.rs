#![forbid(unsafe_code)]

pub mod fs;
pub mod repository;
