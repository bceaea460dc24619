pub mod arena;
pub mod prefabs;

pub use arena::load_arena;
