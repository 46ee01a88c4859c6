//! Maud templates

pub mod dashboard;
pub mod home;
pub mod layout;
pub mod login;
pub mod record_form;

pub use dashboard::dashboard;
pub use home::home;
pub use layout::{page, Chrome};
pub use login::login;
pub use record_form::{record_form, FormPage};
