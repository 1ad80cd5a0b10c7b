mod cli;
mod panel;
mod pointer;
mod presets;
mod run;
mod scenes;

use anyhow::Result;
use cli::Command;
use optics::OpticalParams;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Params) => {
            print_params();
            Ok(())
        }
        None => run::run(cli.run),
    }
}

fn print_params() {
    let defaults = OpticalParams::default();
    println!(
        "{:<22} {:>8} {:>8} {:>8} {:>9}",
        "control", "min", "max", "step", "default"
    );
    for desc in optics::DESCRIPTORS {
        println!(
            "{:<22} {:>8} {:>8} {:>8} {:>9.3}",
            desc.name,
            desc.min,
            desc.max,
            desc.step,
            defaults.get(desc.slot)
        );
    }
}
