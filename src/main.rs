use clap::Parser;
use sogum::cli::{
    chat, handle_completions, handle_config_init, probe, status, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => sogum::cli::serve::run_serve(args).await,
        Commands::Status(args) => status::handle_status(&args).await.map(|output| {
            println!("{}", output);
        }),
        Commands::Test(args) => probe::handle_test(&args).await.map(|output| {
            println!("{}", output);
        }),
        Commands::Ask(args) => chat::handle_ask(&args).await.map(|reply| {
            println!("{}", reply);
        }),
        Commands::Chat(args) => chat::run_chat(&args).await,
        Commands::Config(ConfigCommands::Init(args)) => {
            handle_config_init(&args).map(|message| {
                println!("{}", message);
            })
        }
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
