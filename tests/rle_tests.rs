use zxlife::Bitmap;
use zxlife::ScreenRegion;
use zxlife::Stepper;
use zxlife::rle;
use zxlife::rules::B3S23;
use zxlife::scene;

#[test]
fn test_patterns() -> anyhow::Result<()> {
    let pattern_dir = std::fs::read_dir("tests/patterns")?;
    let mut tested = 0;
    let mut failed = Vec::new();

    for entry in pattern_dir {
        let path = entry?.path();
        let bytes = std::fs::read(&path)?;

        let mut cells = Vec::new();
        match rle::read_rle(&bytes, |x, y| cells.push((x, y))) {
            Ok(file) => {
                tested += 1;

                assert_eq!(file.rule, Some(B3S23), "{path:?}");

                let (w, h) = file.size.expect("every test pattern has a header");
                assert!(
                    cells.iter().all(|&(x, y)| x < w && y < h),
                    "{path:?} has cells outside its header's bounding box"
                );
            }
            Err(e) => failed.push((path.clone(), e)),
        }
    }

    if !failed.is_empty() {
        for (path, err) in &failed {
            eprintln!("Failed to parse {:?}: {:#}", path, err);
        }

        panic!(
            "{}/{} patterns failed to parse",
            failed.len(),
            tested + failed.len()
        );
    }

    assert!(tested >= 4);

    Ok(())
}

fn stamped(name: &str) -> anyhow::Result<(ScreenRegion, Bitmap)> {
    let region = ScreenRegion::centered();
    let mut live = Bitmap::new();
    let bytes = std::fs::read(format!("tests/patterns/{name}.rle"))?;

    scene::stamp_rle_centered(&mut live, &region, &bytes)?;

    Ok((region, live))
}

#[test]
fn gosper_gun_population() -> anyhow::Result<()> {
    let (region, live) = stamped("gosperglidergun")?;

    assert_eq!(region.population(&live), 36);

    Ok(())
}

#[test]
fn pulsar_has_period_three() -> anyhow::Result<()> {
    let (region, mut live) = stamped("pulsar")?;
    let start = live.clone();
    let mut stepper = Stepper::new(region);

    for generation in 1..=9 {
        stepper.step(&mut live);

        assert_eq!(live == start, generation % 3 == 0, "generation {generation}");
    }

    Ok(())
}

#[test]
fn glider_travels_diagonally() -> anyhow::Result<()> {
    let (region, mut live) = stamped("glider")?;
    let mut stepper = Stepper::new(region);

    let mut start = Vec::new();
    for y in 0..192 {
        for x in 0..256 {
            if live.get(x, y) {
                start.push((x, y));
            }
        }
    }

    for _ in 0..4 {
        stepper.step(&mut live);
    }

    // after 4 generations the glider is the same shape, one cell down and to the right
    assert_eq!(live.population(), 5);
    for (x, y) in start {
        assert!(live.get(x + 1, y + 1));
    }

    Ok(())
}
