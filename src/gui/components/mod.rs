pub mod gallery;
pub mod notification;
pub mod test_print;
