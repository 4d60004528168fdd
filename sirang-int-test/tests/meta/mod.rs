mod store_meta_test;
