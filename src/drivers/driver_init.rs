use crate::error::DynResult;
#[allow(unused_imports)] // In case no drivers are enabled
use crate::drivers::driver::add_driver;
#[cfg(feature = "simulator")]
use crate::drivers::simulator;

pub fn init() -> DynResult<()> {
    #[cfg(feature = "simulator")]
    add_driver(simulator::driver_info());
    Ok(())
}
