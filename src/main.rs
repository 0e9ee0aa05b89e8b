//! # photo-filer CLI
//!
//! Command-line interface for the photo filer.
//!
//! ## Usage
//! ```bash
//! photo-filer ~/DCIM/100APPLE
//! photo-filer IMG_0001.jpg IMG_0002.jpg
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    photo_filer::init_tracing();
    cli::run()
}
