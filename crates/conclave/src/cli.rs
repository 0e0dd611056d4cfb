use clap::Parser;

/// Conclave node: serves the Conclave JSON RPC over HTTP.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Address to bind the RPC server to.
    #[arg(long, default_value = "127.0.0.1", env = "CONCLAVE_BIND")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "8960", env = "CONCLAVE_PORT")]
    pub port: u16,

    /// Serve the test network instead of production.
    #[arg(long, env = "CONCLAVE_TESTNET")]
    pub testnet: bool,

    /// Number of dispatch worker threads.
    #[arg(long, default_value = "4", env = "CONCLAVE_WORKERS", value_parser = parse_workers)]
    pub workers: usize,

    /// Largest accepted request body, in bytes.
    #[arg(long, default_value = "1048576", env = "CONCLAVE_MAX_BODY_BYTES")]
    pub max_body_bytes: usize,
}

fn parse_workers(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("at least one dispatch worker is required".into()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
