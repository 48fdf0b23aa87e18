pub mod split;

pub use split::SplitBreakdown;
