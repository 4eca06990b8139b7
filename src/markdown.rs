pub mod blocks;
pub mod classifier;
pub mod emphasis;
pub mod preprocess;
