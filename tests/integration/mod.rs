//! Integration Tests Module
//!
//! Failover behaviour of the query façade across both sources.
