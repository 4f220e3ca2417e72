//! Serve command.
//!
//! `cmkgui serve` - Serve shared dashboard links.

use anyhow::Context;
use cmkgui_core::GuiConfig;
use cmkgui_server::ShareServer;

pub async fn run(config: &GuiConfig) -> anyhow::Result<()> {
    let server = ShareServer::from_config(config).context("Failed to set up share server")?;

    println!("Serving shared dashboards on http://{}", server.bind_address());
    println!(
        "  Share links: {}/shared_dashboard.py?cmk-token=<token>",
        config.server.public_base_url()
    );

    server.run().await.context("Share server failed")
}
