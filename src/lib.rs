pub mod mocks;

pub use client::*;
