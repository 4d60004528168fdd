mod store_test;
mod store_mode_test;
