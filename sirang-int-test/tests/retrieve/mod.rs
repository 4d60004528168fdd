mod retrieve_test;
