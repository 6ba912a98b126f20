mod config_tests;
mod scheduler_tests;
