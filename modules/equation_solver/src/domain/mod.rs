pub mod error;
pub mod service;

#[cfg(test)]
mod service_test;
