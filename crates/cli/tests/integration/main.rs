mod build_tests;
mod common;
mod render_tests;
mod resolve_tests;
