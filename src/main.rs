use access_proxy::utils::display::DisplayFormatter;
use access_proxy::{AccessGuard, EchoSubject, EvenSecond, ExpiringCache, Proxy, ProxyConfig};
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const CONFIG_PATH: &str = "access_proxy.json";
const DEMO_PAUSE_MARGIN: Duration = Duration::from_secs(1);

async fn send(proxy: &Proxy, display: &DisplayFormatter, input: &str) {
    match proxy.request_with_outcome(input).await {
        Ok((response, outcome)) => println!("{}", display.format_response(&response, outcome)),
        Err(e) => println!("{}", display.format_error(&e)),
    }
}

async fn run_demo(proxy: &Proxy, display: &DisplayFormatter) {
    println!("{}", display.format_header("Demo"));
    send(proxy, display, "Request 1").await;
    send(proxy, display, "Request 2").await;
    send(proxy, display, "Request 1").await;

    // Wait just past the cache lifetime so the last request misses again.
    let pause = proxy.cache().lifetime() + DEMO_PAUSE_MARGIN;
    println!("Waiting {} seconds...", pause.as_secs());
    tokio::time::sleep(pause).await;

    send(proxy, display, "Request 1").await;
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting access proxy");

    let config = ProxyConfig::load(CONFIG_PATH)?;
    debug!("Cache lifetime: {:?}", config.cache_lifetime());
    let cache = Arc::new(ExpiringCache::new(config.cache_lifetime()));
    let proxy = Proxy::new(AccessGuard::new(EvenSecond), cache, Arc::new(EchoSubject::new()));
    let display = DisplayFormatter::new();

    println!("=== Access Proxy ===");
    println!("Commands:");
    println!("  <request>    - Send a request through the proxy");
    println!("  demo         - Run the scripted cache/expiry scenario");
    println!("  stats        - Show cache statistics");
    println!("  exit         - Exit the program");

    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let command = input.trim();
        match command {
            "" => continue,
            "exit" => {
                debug!("Received exit command");
                break;
            }
            "demo" => run_demo(&proxy, &display).await,
            "stats" => {
                println!("{}", display.format_header("Statistics"));
                println!(
                    "{}",
                    display.format_stats_table(&proxy.stats(), proxy.cache().len())
                );
            }
            request => {
                debug!("Sending request: {}", request);
                send(&proxy, &display, request).await;
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
