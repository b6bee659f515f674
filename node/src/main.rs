// Demonstration driver: initialize the all-zero state, build a genesis chain
// of empty blocks and push each one through the state-transition function.
// Exits non-zero on the first transition error.

mod driver;

use dotenv::dotenv;

use crate::driver::run_chain;

fn print_help() {
    println!("jam-node");
    println!();
    println!("\x1b[1mUsage example:\x1b[0m\n");
    println!("jam-node --blocks 100\t Apply 100 empty blocks to the zero state");
    println!("jam-node --blocks 100 --encode\t Also print the final encoded state size");
    println!();
}

fn main() {
    let args = std::env::args().collect::<Vec<_>>();

    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut blocks: u32 = 10;
    let mut encode_state = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_ref() {
            "--help" | "-h" => {
                print_help();
                return;
            }
            "--version" | "-v" => {
                println!("jam-node version {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--blocks" => {
                i += 1;
                blocks = match args.get(i).map(|n| n.parse::<u32>()) {
                    Some(Ok(n)) => n,
                    _ => {
                        println!("Error: --blocks expects a number");
                        print_help();
                        std::process::exit(2);
                    }
                };
            }
            "--encode" => {
                encode_state = true;
            }
            unknown => {
                println!("Error: Unknown argument '{unknown}'");
                print_help();
                std::process::exit(2);
            }
        }
        i += 1;
    }

    match run_chain(blocks, encode_state) {
        Ok(final_slot) => {
            log::info!("chain advanced to slot {final_slot}");
        }
        Err(error) => {
            log::error!("state transition failed: {error}");
            std::process::exit(1);
        }
    }
}
