//! Integration test modules

mod connect_flow_tests;
mod store_file_tests;
