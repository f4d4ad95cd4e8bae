//! Logger singleton walkthrough.
//!
//! Appends three lines to `Application.log` in the working directory.  A
//! failure to open the file is fatal: the error propagates out of `main`.

use design_patterns::creational::Logger;
use log::info;

fn main() -> design_patterns::core::Result<()> {
    env_logger::init();

    let _scope = Logger::scope();

    Logger::instance()?.log_error("this is an error message")?;
    Logger::instance()?.log_warning("this is a warning message")?;
    Logger::instance()?.log_info("this is an info message")?;

    let path = Logger::instance()?.path().to_path_buf();
    info!("logger writes to {}", path.display());
    println!("wrote 3 line(s) to {}", path.display());
    Ok(())
}
