pub mod search;
pub mod shell;
pub mod world_map;
