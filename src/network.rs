pub mod supervisor;

pub use supervisor::ListenerSupervisor;
