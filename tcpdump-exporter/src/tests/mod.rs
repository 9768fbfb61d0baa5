mod services_test;
