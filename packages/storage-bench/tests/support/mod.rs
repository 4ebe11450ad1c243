#![allow(dead_code)]

pub mod fake_store;
pub mod scenarios;

pub use fake_store::{Call, Cost, FakeClock, FakeStore};
