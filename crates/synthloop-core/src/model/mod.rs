pub mod item;
pub mod sequence;

pub use item::Item;
pub use sequence::Loop;
