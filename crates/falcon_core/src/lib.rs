//! Task tracking core: recurrence evaluation, view filtering, pure store
//! reducers, and persistence to a local key-value file and JSON snapshots.

pub mod calendar;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod session;
pub mod share;
pub mod storage;
pub mod view;
