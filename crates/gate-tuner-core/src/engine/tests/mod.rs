//! Engine tests: decision pipeline, outcome handling, and reporting.

mod helpers;
