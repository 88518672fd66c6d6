// Library exports for testing
// The binaries (main.rs, bin/squoosh_pack.rs) import these as well

pub mod error;
pub mod launch;
pub mod logger;

#[cfg(test)]
mod tests;
