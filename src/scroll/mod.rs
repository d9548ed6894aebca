pub mod frame_loop;
pub mod lock;
pub mod smooth;
