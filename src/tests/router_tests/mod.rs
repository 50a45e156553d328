mod assignment_tests;
mod interaction_tests;
mod queue_tests;
