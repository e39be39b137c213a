pub mod chat;
pub mod contacts;
pub mod setup;
pub mod top_app_bar;
