//! Test modules for the timing parser

pub mod filename_tests;
pub mod parser_tests;
