use std::{env, env::VarError};

/// There's no real CLI for the server, so any argument prints the help text and the current configuration.
/// Returns true if help was printed and the process should exit.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print. The NATS url may embed credentials, so it is left out.
    const DISPLAY_ENVS: [&str; 13] = [
        "RUST_LOG",
        "ORDERS_HOST",
        "ORDERS_PORT",
        "ORDERS_DATABASE_URL",
        "ORDERS_DB_MAX_CONNECTIONS",
        "ORDERS_STORAGE_TIMEOUT_MS",
        "ORDERS_HYDRATION_TIMEOUT_MS",
        "ORDERS_STREAM",
        "ORDERS_SUBJECT",
        "ORDERS_CONSUMER_GROUP",
        "ORDERS_ACK_WAIT_SECS",
        "ORDERS_MAX_DELIVER",
        "ORDERS_MAX_ACK_PENDING",
    ];

    println!("Current environment values (EXCLUDING variables that may contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
