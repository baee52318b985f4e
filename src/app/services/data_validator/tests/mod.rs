//! Test modules for the data validator
