use anyhow::Result;
use bridge_core::BridgeConfig;
use bridge_server::AppState;

pub fn run(port: Option<u16>) -> Result<()> {
    // An explicit flag wins over PORT; the rest of the config may be incomplete.
    let port = match port {
        Some(port) => port,
        None => BridgeConfig::listen_port_from_env()?,
    };
    let state = AppState::from_config(BridgeConfig::from_env());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("ticket-bridge → http://localhost:{actual_port}  (PID {})", std::process::id());

        tokio::select! {
            res = bridge_server::serve_on(state, listener) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
