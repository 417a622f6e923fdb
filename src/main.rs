use std::io::{self, Write};
use std::process;

use polycli::config::ProcessEnv;
use polycli::dispatch;

fn main() {
    let env = ProcessEnv::capture();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();
    let code = dispatch::run(std::env::args_os(), &env, &mut stdout, &mut stderr);
    let _ = stdout.flush();
    process::exit(code);
}
