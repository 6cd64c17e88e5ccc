use anyhow::Result;
use ledger_core::config::LedgerConfig;
use std::path::Path;

/// Start the ledger HTTP API, blocking until Ctrl-C.
pub fn run(db_path: &Path, config: LedgerConfig, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let db_buf = db_path.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();

        println!("Ledger API → http://localhost:{actual_port}");

        tokio::select! {
            res = ledger_server::serve_on(db_buf, config, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
