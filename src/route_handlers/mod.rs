pub mod home;
pub mod html_template;
pub mod not_found;
pub mod webhook_list;
pub mod webhooks;
