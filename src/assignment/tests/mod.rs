mod assignment_service_tests;
mod domain_tests;
