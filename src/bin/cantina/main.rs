//! cantina - play an arpeggio through the harmonic renderer
//!
//! Run with: RUST_LOG=info cargo run

mod app;

use app::Cantina;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // A minor, up and down
    Cantina::new()
        .bpm(132.0)
        .harmonics(8)
        .gain_db(-12.0)
        .arpeggio(&[57, 60, 64, 69, 72, 69, 64, 60])
        .bars(4)
        .run()
}
