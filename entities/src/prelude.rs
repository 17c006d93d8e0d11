pub use super::album::Entity as Album;
pub use super::message::Entity as Message;
pub use super::song::Entity as Song;
pub use super::user::Entity as User;
