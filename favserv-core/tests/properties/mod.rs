//! Property test modules

mod codec_tests;
mod resolver_tests;
mod store_tests;
