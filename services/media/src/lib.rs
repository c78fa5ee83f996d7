//! Media lifecycle worker: deletes expired stories and their files on a
//! schedule.

pub mod config;
pub mod database;
pub mod models;
pub mod sweeper;
