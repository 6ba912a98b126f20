mod pattern_tests;
mod resolver_tests;
