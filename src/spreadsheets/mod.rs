pub mod export_xlsx;

pub use export_xlsx::export_queue_xlsx;
