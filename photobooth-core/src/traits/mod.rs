pub mod booth_delegate;
pub mod export_target;
pub mod frame_source;
pub mod overlay_source;
