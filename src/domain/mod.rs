pub mod assignment;
pub mod attribution;
pub mod interaction;
pub mod lead;
pub mod queues;
pub mod scoring;

#[cfg(test)]
pub mod testutil;
