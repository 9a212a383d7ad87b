use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

use stomp_wire::{Client, ClientError, Frame};

use super::args::Cli;
use super::commands::{CommandResult, execute_command, print_help};
use super::exit_codes;

/// Run the interactive session.
pub async fn run(cli: &Cli) -> Result<(), (String, u8)> {
    println!("Connecting to {}...", cli.url);

    let client = Client::connect_url(&cli.url, cli.login.as_deref(), cli.passcode.as_deref())
        .await
        .map_err(|e| connect_failure(&e, &cli.url))?;
    println!("Connected.");

    let (mut reader, mut writer) = client.into_split();

    for dest in &cli.subscribe {
        writer.subscribe(dest, &[]).await.map_err(|e| {
            (
                format!("Failed to subscribe to '{}': {}", dest, e),
                exit_codes::NETWORK_ERROR,
            )
        })?;
        println!("Subscribed to: {}", dest);
    }

    // Channel to receive user commands from stdin reader
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<String>(16);

    // Spawn blocking stdin reader
    std::thread::spawn(move || {
        let stdin = io::stdin();
        let reader = stdin.lock();
        for line in reader.lines() {
            match line {
                Ok(l) => {
                    if cmd_tx.blocking_send(l).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    println!();
    print_help();
    println!();
    prompt();

    loop {
        tokio::select! {
            line = cmd_rx.recv() => {
                // stdin closed
                let Some(line) = line else { break };
                match execute_command(&line, &mut writer).await {
                    CommandResult::Ok => {}
                    CommandResult::Quit => break,
                    CommandResult::Error(msg) => eprintln!("{}", msg),
                }
                prompt();
            }
            frame = reader.next() => {
                match frame {
                    Ok(frame) => {
                        print_frame(&frame);
                        prompt();
                    }
                    Err(ClientError::Disconnected) => {
                        println!("\nConnection closed by broker.");
                        break;
                    }
                    Err(e) => {
                        return Err((format!("Session failed: {}", e), exit_codes::PROTOCOL_ERROR));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

/// Print an incoming frame with a timestamp.
fn print_frame(frame: &Frame) {
    let now = chrono::Local::now().format("%H:%M:%S");
    println!("\n[{}] {} received:", now, frame.command);
    for (k, v) in &frame.headers {
        println!("  {}: {}", k, v);
    }
    if let Some(body) = &frame.body {
        match frame.body_str() {
            Some(text) => println!("  Body: {}", text),
            None => println!("  Body: ({} bytes, binary)", body.len()),
        }
    }
}

/// Format a connection error with user-friendly messaging.
fn connect_failure(err: &ClientError, url: &str) -> (String, u8) {
    match err {
        ClientError::Io(io_err) => {
            let message = match io_err.kind() {
                std::io::ErrorKind::ConnectionRefused => {
                    format!("Connection refused: {}", url)
                }
                std::io::ErrorKind::TimedOut => {
                    format!("Connection timed out: {}", url)
                }
                _ => {
                    format!("Connection failed: {}", io_err)
                }
            };
            (message, exit_codes::NETWORK_ERROR)
        }
        ClientError::InvalidUrl { .. } => (err.to_string(), exit_codes::USAGE_ERROR),
        other => (
            format!("Connection failed: {}", other),
            exit_codes::PROTOCOL_ERROR,
        ),
    }
}
