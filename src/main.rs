use clap::Parser;
use sdf_fontgen::{generate_fonts, Args, MsdfBmfont};

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let config = args.config();
    let rasterizer = MsdfBmfont::new(&args.rasterizer);
    log::debug!("{:?}", config);

    let before = std::time::Instant::now();
    match generate_fonts(&config, &rasterizer) {
        Ok(generated) => {
            log::info!(
                "Generated {} atlases in {:.2?}",
                generated.len(),
                before.elapsed()
            );
        }
        Err(e) => {
            log::error!("Error generating fonts: {}", e);
            std::process::exit(1);
        }
    }
}
