use std::collections::HashMap;

use clap::{Args, Parser, Subcommand};
use elf_reader::modules::elf::ElfModule;

#[derive(Subcommand, Debug)]
enum Commands {
    /// elf
    Elf(Elf),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
pub struct Elf {
    #[arg(short, long)]
    function: String,

    #[arg(short = 'F', long)]
    file: String,

    #[arg(short, long)]
    options: Option<String>,
}

fn main() {
    sigpipe::reset();

    let mut _f_args = HashMap::new();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Elf(elf) => {
            if let Some(x) = elf.options.as_ref() {
                let options = x.split(',');
                for option in options {
                    let kv = option.split('=');
                    let kv = kv.collect::<Vec<&str>>();
                    _f_args.insert(kv[0].trim().to_string(), kv[1].trim().to_string());
                }
            }

            let module = match ElfModule::new(&elf.file) {
                Ok(o) => o,
                Err(e) => {
                    println!("[Error]:{}", e);
                    return;
                }
            };
            let function = &elf.function;
            if function.eq("sections") {
                if let Err(e) = module.list_sections(_f_args) {
                    println!("[Error]:{}", e);
                }
            } else if function.eq("stat") {
                if let Err(e) = module.stat(_f_args) {
                    println!("[Error]:{}", e);
                }
            } else {
                println!("unknown function: {}", function);
            }
        }
    }
}
