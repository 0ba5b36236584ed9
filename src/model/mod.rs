pub mod attendance;
pub mod department;
pub mod event;
pub mod member;
pub mod notification;
pub mod role;
pub mod user;
pub mod zone;
