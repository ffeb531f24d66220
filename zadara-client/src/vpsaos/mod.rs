//! Object storage (VPSA Object Storage) resources.

pub mod controllers;
