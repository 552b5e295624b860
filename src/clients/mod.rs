pub mod maestro;

pub use maestro::MaestroClient;
