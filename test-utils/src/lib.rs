pub mod arbitrary;
pub mod asserts;
pub mod random;
pub mod tamper;
pub mod tracing;
