pub mod prelude;

pub mod album;
pub mod message;
pub mod song;
pub mod user;

pub mod album_local_model;
pub mod message_local_model;
pub mod song_local_model;
pub mod user_local_model;
