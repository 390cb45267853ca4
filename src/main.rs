use clap::Parser;
use colored::Colorize;
use inquire::Confirm;
use sectool::{
    cli::Cli,
    common::SystemRunner,
    config,
    handlers::{self, Session},
};
use std::io;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(e.exit_code());
    }
}

fn run() -> sectool::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    let runner = SystemRunner;
    let env = handlers::bootstrap_host(&runner)?;

    let read_only = cli.command.as_ref().is_some_and(|c| c.is_read_only());
    if !read_only {
        handlers::confirm_privileges(&env, cli.yes, prompt_continue)?;
    }

    let mut session = Session::new(env, &config, &runner)?;
    match cli.command {
        Some(command) => handlers::handle_command(&mut session, command),
        None => {
            println!(
                "🖥️  {} ({} via {})",
                session.env.distro_name.bold(),
                session.env.os,
                session.env.package_manager
            );
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            handlers::run_menu(&mut session, &mut input, &mut output)
        }
    }
}

fn prompt_continue() -> sectool::Result<bool> {
    Ok(Confirm::new("Continue anyway?")
        .with_default(false)
        .prompt()?)
}
