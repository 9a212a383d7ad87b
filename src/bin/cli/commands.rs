use stomp_wire::{ClientWriter, UnsupportedVerb, Verb};

/// Result of executing a command
pub enum CommandResult {
    /// Command executed successfully
    Ok,
    /// Command requests exit
    Quit,
    /// Error executing command
    Error(String),
}

/// Parse and execute one input line against the writer half.
///
/// The first word is resolved through [`Verb`], so every frame the library
/// can format is reachable here and anything else is rejected up front.
pub async fn execute_command(line: &str, writer: &mut ClientWriter) -> CommandResult {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return CommandResult::Ok;
    };

    match word {
        "quit" | "exit" | "q" => return CommandResult::Quit,
        "help" | "?" => {
            print_help();
            return CommandResult::Ok;
        }
        _ => {}
    }

    let verb = match word.parse::<Verb>() {
        Ok(verb) => verb,
        Err(UnsupportedVerb(name)) => {
            return CommandResult::Error(format!(
                "unsupported verb: {}. Type 'help' for commands.",
                name
            ));
        }
    };

    let args: Vec<&str> = words.collect();
    run_verb(verb, &args, writer).await
}

async fn run_verb(verb: Verb, args: &[&str], writer: &mut ClientWriter) -> CommandResult {
    let outcome = match verb {
        Verb::Connect => {
            return CommandResult::Error("CONNECT is sent at startup; already connected".into());
        }
        Verb::Send => {
            if args.len() < 2 {
                return usage("send <destination> <message>");
            }
            let message = args[1..].join(" ");
            writer.send(args[0], message.as_bytes(), &[]).await
        }
        Verb::Subscribe => {
            if args.len() != 1 {
                return usage("subscribe <destination>");
            }
            writer.subscribe(args[0], &[]).await
        }
        Verb::Unsubscribe => {
            if args.len() != 2 {
                return usage("unsubscribe <destination> <id>");
            }
            writer.unsubscribe(args[0], args[1], &[]).await
        }
        Verb::Ack => {
            if args.len() != 1 {
                return usage("ack <id>");
            }
            writer.ack(args[0], &[]).await
        }
        Verb::Nack => {
            if args.len() != 1 {
                return usage("nack <id>");
            }
            writer.nack(args[0], &[]).await
        }
        Verb::Begin => {
            if args.len() != 1 {
                return usage("begin <transaction>");
            }
            writer.begin(args[0], &[]).await
        }
        Verb::Commit => {
            if args.len() != 1 {
                return usage("commit <transaction>");
            }
            writer.commit(args[0], &[]).await
        }
        Verb::Abort => {
            if args.len() != 1 {
                return usage("abort <transaction>");
            }
            writer.abort(args[0], &[]).await
        }
        Verb::Disconnect => {
            if args.len() != 1 {
                return usage("disconnect <receipt-id>");
            }
            writer.disconnect(args[0], &[]).await
        }
    };

    match outcome {
        Ok(()) => CommandResult::Ok,
        Err(e) => CommandResult::Error(format!("{} failed: {}", verb, e)),
    }
}

fn usage(text: &str) -> CommandResult {
    CommandResult::Error(format!("Usage: {}", text))
}

/// Print help text
pub fn print_help() {
    println!("Commands:");
    println!("  send <destination> <message>    - Send a message");
    println!("  subscribe <destination>         - Subscribe to a destination");
    println!("  unsubscribe <destination> <id>  - Drop a subscription");
    println!("  ack <id>                        - Acknowledge a message");
    println!("  nack <id>                       - Reject a message");
    println!("  begin <transaction>             - Open a transaction");
    println!("  commit <transaction>            - Commit a transaction");
    println!("  abort <transaction>             - Roll back a transaction");
    println!("  disconnect <receipt-id>         - Send DISCONNECT with a receipt");
    println!("  quit                            - Exit");
}
