mod blockchain;
mod config;
mod prelude;
mod price;
mod report;
mod retry;
mod routines;
mod rpc;
mod scan;

use std::io::{BufRead, Write};

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    CheckBalances,
    Exit,
}

fn parse_menu_choice(input: &str) -> Option<MenuAction> {
    match input.trim() {
        "0" => Some(MenuAction::Exit),
        "1" => Some(MenuAction::CheckBalances),
        _ => None,
    }
}

fn show_menu(project_name: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", project_name);
    println!("{}", "=".repeat(60));
    println!("\nSelect an action:");
    println!("  1. Check balances in all EVM networks");
    println!("  0. Exit");
    print!("\nEnter number (0-1): ");
    let _ = std::io::stdout().flush();
}

/// Reads one line from stdin; `None` on EOF ends the menu loop.
fn read_line() -> Option<String> {
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = AppConfig::load();

    let oracle = CoinGeckoApi;

    loop {
        show_menu(&config.project_name);

        let line = match read_line() {
            Some(line) => line,
            None => break,
        };

        match parse_menu_choice(&line) {
            Some(MenuAction::Exit) => {
                println!("\nGoodbye!");
                break;
            }
            Some(MenuAction::CheckBalances) => {
                let routine = BalanceCheckRoutine::new(&config, &oracle);
                if let Err(report) = routine.run().await {
                    // Full stack goes to the diagnostic channel only; the
                    // report output never carries traces.
                    log::error!("{} failed:\n{:?}", routine.name(), report);
                }

                println!("\nPress Enter to return to menu...");
                if read_line().is_none() {
                    break;
                }
            }
            None => {
                println!("Invalid input. Please enter 0 or 1.");
            }
        }
    }
}
