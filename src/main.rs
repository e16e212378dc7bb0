use anyhow::Context;
use shapeshop::{config::EditorConfig, EditorApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => EditorConfig::default(),
    };

    EditorApp::new(config).run()
}
