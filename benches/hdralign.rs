use criterion::{criterion_group, criterion_main, Criterion};
use hdralign::lowlevel::{Kernel, NccDirect, NccIncremental};
#[cfg(feature = "rayon")]
use hdralign::Params;
use hdralign::{DisplacementFinder, ImageView};
use std::hint::black_box;

fn make_image(width: usize, height: usize, shift_x: usize, shift_y: usize) -> Vec<u16> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = (x + shift_x, y + shift_y);
            for c in 0..3 {
                let value = ((sx * 13 + c * 29) ^ (sy * 7) ^ (sx * sy)) & 0xFFF;
                data.push(value as u16);
            }
        }
    }
    data
}

fn bench_kernels(c: &mut Criterion) {
    let (width, height) = (160, 160);
    let image = make_image(width, height, 0, 0);
    let view = ImageView::from_slice(&image, width, height, 3).unwrap();
    let template = view.roi(60, 60, 41, 41).unwrap();
    let window = view.roi(30, 30, 101, 101).unwrap();

    c.bench_function("ncc_incremental_41_in_101", |b| {
        b.iter(|| black_box(NccIncremental::search(template, window).unwrap()));
    });
    c.bench_function("ncc_direct_41_in_101", |b| {
        b.iter(|| black_box(NccDirect::search(template, window).unwrap()));
    });
}

fn bench_finder(c: &mut Criterion) {
    let (width, height) = (640, 480);
    let a = make_image(width, height, 0, 0);
    let b = make_image(width, height, 9, 4);
    let a = ImageView::from_slice(&a, width, height, 3).unwrap();
    let b = ImageView::from_slice(&b, width, height, 3).unwrap();

    let finder = DisplacementFinder::new();
    c.bench_function("find_default_640x480", |bench| {
        bench.iter(|| black_box(finder.find(a, b)));
    });

    #[cfg(feature = "rayon")]
    {
        let finder_par = DisplacementFinder::new().with_params(Params {
            parallel: true,
            ..Params::default()
        });
        c.bench_function("find_default_640x480_parallel", |bench| {
            bench.iter(|| black_box(finder_par.find(a, b)));
        });
    }
}

criterion_group!(benches, bench_kernels, bench_finder);
criterion_main!(benches);
