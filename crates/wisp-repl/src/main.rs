use clap::Parser;

use wisp_repl::Cli;

fn main() {
    let cli = Cli::parse();
    let prog_name = std::env::args().next().unwrap_or_else(|| "wisp".to_string());
    let code = wisp_repl::run(cli, &prog_name);
    std::process::exit(code);
}
