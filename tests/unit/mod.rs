//! Unit Tests Module

pub mod circuit_breaker;
pub mod scanner;
