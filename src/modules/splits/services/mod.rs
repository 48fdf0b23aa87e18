pub mod split_calculator;

pub use split_calculator::SplitCalculator;
