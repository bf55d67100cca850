pub mod gpu_context;
pub mod timer;
