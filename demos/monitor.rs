use stomp_wire::{Client, ClientError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // This example expects a STOMP broker on localhost:61613 (e.g. RabbitMQ with stomp plugin).

    let mut client =
        Client::connect_url("tcp://127.0.0.1:61613/", Some("guest"), Some("guest")).await?;

    client.subscribe("/topic/events", &[]).await?;

    loop {
        match client.next().await {
            Ok(frame) => {
                println!("{}", frame);
                // MESSAGE frames carry an `ack` header in client ack modes
                if let Some(id) = frame.get_header("ack") {
                    client.ack(id, &[]).await?;
                }
            }
            Err(ClientError::Disconnected) => {
                println!("broker closed the connection");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
