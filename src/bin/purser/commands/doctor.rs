//! `purser doctor` command

use anyhow::Result;

use crate::GlobalOptions;
use purser::ops::{doctor, format_report, DoctorOptions};

pub fn execute(global: &GlobalOptions) -> Result<()> {
    let verbose = global.shell.is_verbose();

    let report = doctor(DoctorOptions { verbose })?;

    // Print the formatted report
    print!("{}", format_report(&report, verbose));

    // Exit with error code if no generation tool is present
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
