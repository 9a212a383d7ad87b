use std::time::Duration;
use stomp_wire::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // This example expects a STOMP broker on localhost:61613 (e.g. RabbitMQ with stomp plugin).

    let mut client = Client::connect("127.0.0.1", 61613, Some("guest"), Some("guest")).await?;

    // CONNECT has been sent; the first frame back is CONNECTED (or ERROR).
    let reply = client.next().await?;
    println!("broker replied:\n{}", reply);

    client.subscribe("/queue/test", &[]).await?;
    client
        .send("/queue/test", b"hello from stomp-wire", &[])
        .await?;

    // Try to read one incoming frame, but don't block forever.
    match tokio::time::timeout(Duration::from_secs(5), client.next()).await {
        Ok(Ok(frame)) => println!("received frame:\n{}", frame),
        Ok(Err(e)) => println!("connection ended: {}", e),
        Err(_) => println!("timed out waiting for a frame"),
    }

    client.disconnect("quickstart-bye", &[]).await?;
    Ok(())
}
