use std::convert::Infallible;
use std::ops::ControlFlow;
use std::thread;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zxlife::Bitmap;
use zxlife::Driver;
use zxlife::ScreenRegion;
use zxlife::Stepper;
use zxlife::scene;

mod io;
mod options;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let region = ScreenRegion::centered();
    let mut live = Bitmap::new();

    // seed the screen, then hand it over to the engine for good
    let mut rule = match args.rle_file() {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            scene::stamp_rle_centered(&mut live, &region, &bytes)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => {
            scene::classic(&mut live, &region);
            None
        }
    };

    if let Some(r) = args.rule()? {
        rule = Some(r);
    }
    let rule = rule.unwrap_or_default();

    let (x, y) = region.origin();
    info!(%rule, x, y, size = region.width(), "Seeded region");

    let mut driver = Driver::new(Stepper::with_rules(region, rule));
    let sleep = args.sleep()?;

    if args.headless() {
        let Some(sleep) = sleep else {
            driver.run(&mut live);
        };

        let never: Infallible = driver.run_with(&mut live, |_| {
            thread::sleep(sleep);
            ControlFlow::Continue(())
        });
        match never {}
    }

    let mut terminal = io::Terminal::new().context("Failed to set up the terminal")?;

    driver.run_with(&mut live, |bitmap| {
        let frame = terminal
            .render(bitmap)
            .and_then(|()| io::poll_events());

        match frame {
            Ok(Some(io::Event::Exit)) => return ControlFlow::Break(Ok(())),
            Ok(None) => {}
            Err(e) => return ControlFlow::Break(Err(e)),
        }

        if let Some(sleep) = sleep {
            thread::sleep(sleep);
        }

        ControlFlow::Continue(())
    })?;

    Ok(())
}
