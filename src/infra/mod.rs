pub mod db;
pub mod identity;
pub mod media_sink;
pub mod video_store;
