//! Per-service lifecycle operations.

mod api;
mod bucket;
mod logs;
mod role;
