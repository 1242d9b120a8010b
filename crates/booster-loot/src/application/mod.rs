//! Application layer for the booster context.

pub mod command_handlers;
