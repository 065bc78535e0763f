use std::{env, process};

use anyhow::Result;

use rocks_lang::Rocks;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut rocks = Rocks::new();

    match args.len() {
        1 => rocks.run_prompt(),
        2 => rocks.run_file(&args[1]),
        _ => {
            eprintln!("Usage: rocks [script]");
            process::exit(rocks_lang::EX_USAGE);
        }
    }
}
