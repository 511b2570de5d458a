pub mod directory;
pub mod export;
pub mod metadata;
pub mod overlay;
