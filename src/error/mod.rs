pub mod acadify;

pub use acadify::AcadifyError;
