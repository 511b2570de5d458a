pub mod booth;
pub mod countdown;
pub mod frames;
