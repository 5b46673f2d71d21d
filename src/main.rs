use std::io::{self, Write};
use std::process;

use anyhow::Result;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use mcsrvstat::{Client, Transport};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mcsrvstat",
    about = "mcsrvstat is a command line interface for the mcsrvstat API."
)]
enum Command {
    /// Fetch the status of the server
    Status {
        /// Server address, `host` or `host:port`
        #[structopt(name = "SERVER")]
        servers: Vec<String>,
    },
}

async fn run<T, O, E>(command: Command, client: &Client<T>, out: &mut O, err: &mut E) -> Result<i32>
where
    T: Transport,
    O: Write,
    E: Write,
{
    match command {
        Command::Status { servers } => {
            let address = match servers.as_slice() {
                [address] => address,
                _ => {
                    writeln!(out, "Must provide exactly one SERVER to get status for")?;
                    return Ok(1);
                }
            };

            match client.status(address).await {
                Ok(status) => {
                    writeln!(out, "Status:")?;
                    serde_json::to_writer_pretty(&mut *out, &status)?;
                    writeln!(out)?;
                    Ok(0)
                }
                Err(e) => {
                    writeln!(out, "Failed to get status for server: {}", address)?;
                    writeln!(err, "{:#}", anyhow::Error::from(e))?;
                    Ok(1)
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let command = Command::from_args();

    let result = match Client::new() {
        Ok(client) => run(command, &client, &mut io::stdout(), &mut io::stderr()).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use mcsrvstat::{BoxError, ClientOption};
    use reqwest::Request;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Default)]
    struct Refusing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Refusing {
        async fn execute(&self, _request: Request) -> Result<reqwest::Response, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err("connection refused".into())
        }
    }

    async fn run_status(servers: &[&str], client: &Client<impl Transport>) -> (i32, String, String) {
        let mut args = vec!["mcsrvstat", "status"];
        args.extend_from_slice(servers);
        let command = Command::from_iter_safe(args).unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(command, client, &mut out, &mut err).await.unwrap();

        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_cli_status_parses() {
        let Command::Status { servers } =
            Command::from_iter_safe(["mcsrvstat", "status", "play.example.com"]).unwrap();
        assert_eq!(servers, vec!["play.example.com"]);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Command::from_iter_safe(["mcsrvstat"]).is_err());
        assert!(Command::from_iter_safe(["mcsrvstat", "ping", "x"]).is_err());
    }

    #[tokio::test]
    async fn test_no_server_is_usage_error() {
        let client = Client::with_transport(Refusing::default(), vec![]).unwrap();

        let (code, out, err) = run_status(&[], &client).await;

        assert_eq!(code, 1);
        assert_eq!(out, "Must provide exactly one SERVER to get status for\n");
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn test_two_servers_is_usage_error() {
        let transport = Refusing::default();
        let client = Client::with_transport(transport, vec![]).unwrap();

        let (code, out, _) = run_status(&["a.example.com", "b.example.com"], &client).await;

        assert_eq!(code, 1);
        assert!(out.starts_with("Must provide exactly one SERVER"));
    }

    #[tokio::test]
    async fn test_usage_error_makes_no_request() {
        let client = Client::with_transport(Refusing::default(), vec![]).unwrap();
        run_status(&[], &client).await;
        run_status(&["a", "b", "c"], &client).await;

        let (code, _, _) = run_status(&["a"], &client).await;

        assert_eq!(code, 1);
        // Only the single-argument call reached the transport.
        assert_eq!(client_calls(&client), 1);
    }

    fn client_calls(client: &Client<Refusing>) -> usize {
        client.transport().calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_failure_output() {
        let client = Client::with_transport(Refusing::default(), vec![]).unwrap();

        let (code, out, err) = run_status(&["play.example.com"], &client).await;

        assert_eq!(code, 1);
        assert_eq!(out, "Failed to get status for server: play.example.com\n");
        assert_eq!(err, "failed to send request: connection refused\n");
    }

    #[tokio::test]
    async fn test_success_output() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = stream.read(&mut buf).await;

            let body = r#"{"online":true,"ip":"1.2.3.4","port":25565,"players":{"online":3,"max":20}}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
        });

        let transport = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = Client::with_transport(
            transport,
            vec![ClientOption::BaseUrl(format!("http://{}/", addr))],
        )
        .unwrap();

        let (code, out, err) = run_status(&["play.example.com"], &client).await;

        assert_eq!(code, 0);
        assert!(err.is_empty());
        assert!(out.starts_with("Status:\n{\n"));

        let json: serde_json::Value = serde_json::from_str(&out["Status:\n".len()..]).unwrap();
        assert_eq!(json["online"], true);
        assert_eq!(json["players"]["online"], 3);
        assert_eq!(json["players"]["list"], serde_json::json!([]));
    }
}
