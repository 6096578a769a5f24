#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "Identity and task access control for a multi-tenant task tracker: credential"]
#![doc = "hashing, bearer tokens, the creator/assignee access rules, storage backends and"]
#![doc = "the HTTP surface built on them. The binary (`main.rs`) wires these together."]

pub mod access;
pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;

pub use crate::error::AppError;
pub use crate::tasks::TaskService;
