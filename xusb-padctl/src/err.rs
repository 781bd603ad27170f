pub use xusb_if::PadctlError;

pub type Result<T = ()> = core::result::Result<T, PadctlError>;
