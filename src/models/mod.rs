pub mod event;
pub mod notification;
pub mod order;
pub mod request;
