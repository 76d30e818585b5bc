//! Background loops.

pub mod dataset_refresh_loop;
