//! lablogger main entrypoint.

use lablogger::run;
use lablogger::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
