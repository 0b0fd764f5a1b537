//! SQL Server connectivity

mod client;
pub(crate) mod rows;

pub use client::{connect, SqlClient};
