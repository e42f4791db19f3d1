use std::{
    env,
    fs::File,
    io::{self, BufReader, Write},
};

use paging_sim::{repl::REPL, Vm, PAGE_SIZE, PHYSICAL_FRAMES, VIRTUAL_PAGES};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut vm = Vm::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match env::args().nth(1) {
        Some(path) => {
            let file = File::open(path)?;
            REPL::new(BufReader::new(file), false).run(&mut vm, &mut out)
        }
        None => {
            writeln!(
                out,
                "---- {} pages of {} bytes over {} frames, .help for commands ----",
                VIRTUAL_PAGES, PAGE_SIZE, PHYSICAL_FRAMES
            )?;
            let stdin = io::stdin();
            REPL::new(stdin.lock(), true).run(&mut vm, &mut out)
        }
    }
}
