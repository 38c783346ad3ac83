use proptest::prelude::*;

use zxlife::Bitmap;
use zxlife::Region;
use zxlife::ScreenRegion;
use zxlife::Stepper;
use zxlife::scene;
use zxlife::screen;
use zxlife::screen::SCREEN_SIZE;

type Small = Region<8, 8>;

fn small() -> Small {
    Region::at(100, 60).unwrap()
}

/// Sets region-local cells
fn seed<const W: usize, const H: usize>(
    region: &Region<W, H>,
    cells: &[(usize, usize)],
) -> Bitmap {
    let mut live = Bitmap::new();
    for &(rx, ry) in cells {
        let (x, y) = region.to_screen(rx, ry);
        live.set(x, y, true);
    }
    live
}

/// Textbook Life on a plain grid, dead past the edges
fn reference_step(grid: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let h = grid.len() as isize;
    let w = grid[0].len() as isize;

    let alive = |x: isize, y: isize| x >= 0 && y >= 0 && x < w && y < h && grid[y as usize][x as usize];

    (0..h)
        .map(|y| {
            (0..w)
                .map(|x| {
                    let n = [
                        (-1, -1),
                        (0, -1),
                        (1, -1),
                        (-1, 0),
                        (1, 0),
                        (-1, 1),
                        (0, 1),
                        (1, 1),
                    ]
                    .iter()
                    .filter(|&&(dx, dy)| alive(x + dx, y + dy))
                    .count();

                    matches!((alive(x, y), n), (true, 2) | (_, 3))
                })
                .collect()
        })
        .collect()
}

fn to_grid<const W: usize, const H: usize>(region: &Region<W, H>, live: &Bitmap) -> Vec<Vec<bool>> {
    (0..H)
        .map(|ry| (0..W).map(|rx| region.get(live, rx, ry)).collect())
        .collect()
}

#[test]
fn isolated_cell_dies() {
    let region = small();
    let mut live = seed(&region, &[(4, 4)]);

    Stepper::new(region).step(&mut live);

    assert_eq!(live.population(), 0);
}

#[test]
fn block_is_still() {
    let region = small();
    let mut live = seed(&region, &[(3, 3), (4, 3), (3, 4), (4, 4)]);
    let start = live.clone();
    let mut stepper = Stepper::new(region);

    for _ in 0..10 {
        let summary = stepper.step(&mut live);

        assert_eq!(live, start);
        assert_eq!((summary.births, summary.deaths), (0, 0));
    }
}

#[test]
fn blinker_has_period_two() {
    let region = Region::<5, 5>::at(0, 0).unwrap();
    let mut live = seed(&region, &[(1, 2), (2, 2), (3, 2)]);
    let mut stepper = Stepper::new(region);

    insta::assert_snapshot!(region.view(&live).to_string(), @r"
    .....
    .....
    .###.
    .....
    .....
    ");

    stepper.step(&mut live);

    insta::assert_snapshot!(region.view(&live).to_string(), @r"
    .....
    ..#..
    ..#..
    ..#..
    .....
    ");

    let vertical = live.clone();
    for generation in 2..=6 {
        stepper.step(&mut live);

        if generation % 2 == 0 {
            assert_eq!(live, seed(&region, &[(1, 2), (2, 2), (3, 2)]));
        } else {
            assert_eq!(live, vertical);
        }
    }
}

#[test]
fn l_tromino_matches_reference() {
    let region = small();
    let mut live = seed(&region, &[(4, 3), (5, 3), (4, 4)]);
    let mut grid = to_grid(&region, &live);
    let mut stepper = Stepper::new(region);

    for _ in 0..6 {
        stepper.step(&mut live);
        grid = reference_step(&grid);

        assert_eq!(to_grid(&region, &live), grid);
    }

    // the tromino closes into a block
    insta::assert_snapshot!(region.view(&live).to_string(), @r"
    ........
    ........
    ........
    ....##..
    ....##..
    ........
    ........
    ........
    ");
}

#[test]
fn snapshot_is_frozen_during_transition() {
    let region = ScreenRegion::centered();
    let mut live = Bitmap::new();
    scene::classic(&mut live, &region);
    let mut stepper = Stepper::new(region);

    for _ in 0..3 {
        let before = live.clone();
        let mut writes = 0;

        stepper.step_inspect(&mut live, |snapshot, x, y, _| {
            writes += 1;
            assert!(region.contains(x, y));
            assert_eq!(snapshot.as_bytes(), before.as_bytes());
        });

        assert!(writes > 0);
        assert_eq!(stepper.snapshot(), &before);
    }
}

#[test]
fn classic_scene_masked_matches_exhaustive() {
    let region = ScreenRegion::centered();
    let mut masked = Bitmap::new();
    scene::classic(&mut masked, &region);
    let mut exhaustive = masked.clone();

    let mut fast = Stepper::new(region);
    let mut slow = Stepper::new(region);

    for _ in 0..40 {
        let f = fast.step(&mut masked);
        let s = slow.step_exhaustive(&mut exhaustive);

        assert_eq!(masked.as_bytes(), exhaustive.as_bytes());
        assert_eq!((f.births, f.deaths), (s.births, s.deaths));
        assert!(f.evaluated <= s.evaluated);
    }
}

#[test]
fn external_reader_decodes_raw_bytes() {
    let region = small();
    let mut live = seed(&region, &[(1, 2), (2, 2), (3, 2)]);
    Stepper::new(region).step(&mut live);

    let bytes: &[u8; SCREEN_SIZE] = live.as_bytes();

    for ry in 0..8 {
        for rx in 0..8 {
            let (x, y) = region.to_screen(rx, ry);
            let address = screen::pixel_address(x, y);

            assert_eq!(bytes[address.offset] & address.mask != 0, live.get(x, y));
        }
    }
}

fn small_seed() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..16usize, 0..16usize), 0..120)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn masked_step_matches_exhaustive(cells in small_seed()) {
        let region = Region::<16, 16>::at(30, 30).unwrap();
        let mut masked = seed(&region, &cells);
        let mut exhaustive = masked.clone();

        let mut fast = Stepper::new(region);
        let mut slow = Stepper::new(region);

        for _ in 0..12 {
            fast.step(&mut masked);
            slow.step_exhaustive(&mut exhaustive);

            prop_assert_eq!(masked.as_bytes(), exhaustive.as_bytes());
        }
    }

    #[test]
    fn every_change_was_masked(cells in small_seed()) {
        let region = Region::<16, 16>::at(0, 0).unwrap();
        let mut live = seed(&region, &cells);
        let mut stepper = Stepper::new(region);

        for _ in 0..8 {
            stepper.step(&mut live);

            for ry in 0..16 {
                for rx in 0..16 {
                    if region.get(&live, rx, ry) != region.get(stepper.snapshot(), rx, ry) {
                        prop_assert!(stepper.mask().is_marked(rx, ry));
                    }
                }
            }
        }
    }

    #[test]
    fn matches_reference_life(cells in small_seed()) {
        let region = Region::<16, 16>::at(240, 176).unwrap();
        let mut live = seed(&region, &cells);
        let mut grid = to_grid(&region, &live);
        let mut stepper = Stepper::new(region);

        for _ in 0..6 {
            stepper.step(&mut live);
            grid = reference_step(&grid);

            prop_assert_eq!(to_grid(&region, &live), grid.clone());
        }
    }
}
