mod bridge_tests;
mod error;
mod pack;
