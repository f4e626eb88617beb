mod common;

use hdralign::{
    DisplacementFinder, HdrAlignError, ImageView, NccDirect, OwnedImage, Params, RegionStatus,
    Vec2,
};

fn gradient_params() -> Params {
    Params {
        start_search_size: Vec2::new(40, 40),
        start_correl_size: Vec2::new(16, 16),
        max_regions_per_axis: 2,
        ..Params::default()
    }
}

#[test]
fn shifted_gradient_is_recovered_exactly() {
    let (a, b) = common::shifted_pair(100, 100, 7, -3, common::textured_gradient);
    let finder = DisplacementFinder::new().with_params(gradient_params());

    let reg = finder.find(a.view(), b.view()).unwrap();
    assert_eq!(reg.displacement, Vec2::new(7, -3));
    assert_eq!(reg.passes, 1);
    assert_eq!(reg.regions.len(), 4);
    for region in &reg.regions {
        assert_eq!(region.status, RegionStatus::Finished);
        assert_eq!(region.displacement, Vec2::new(7, -3));
        assert_eq!(region.template_size, Vec2::new(16, 16));
        assert_eq!(region.search_size, Vec2::new(40, 40));
        assert!(region.rho > 0.9999);
    }
    assert_eq!(reg.aggregate.used, 4);
    assert_eq!(reg.aggregate.rejected, 0);

    let back = finder.find(b.view(), a.view()).unwrap();
    assert_eq!(back.displacement, Vec2::new(-7, 3));
}

#[test]
fn direct_kernel_agrees_with_incremental() {
    let (a, b) = common::shifted_pair(100, 100, 7, -3, common::textured_gradient);
    let finder = DisplacementFinder::new().with_params(gradient_params());
    let fast = finder.find(a.view(), b.view()).unwrap();
    let slow = finder.find_with::<NccDirect, u8>(a.view(), b.view()).unwrap();
    assert_eq!(fast, slow);
}

#[test]
fn embedded_copy_is_found_at_its_offset() {
    let a = OwnedImage::from_fn(120, 100, 3, common::hash_noise).unwrap();
    let b = OwnedImage::from_fn(160, 140, 3, |x, y, c| {
        if (13..133).contains(&x) && (9..109).contains(&y) {
            common::hash_noise(x - 13, y - 9, c)
        } else {
            common::hash_noise(x + 1000, y + 1000, c + 5)
        }
    })
    .unwrap();

    let reg = DisplacementFinder::new().find(a.view(), b.view()).unwrap();
    assert_eq!(reg.displacement, Vec2::new(13, 9));
    assert_eq!(reg.passes, 2);
    assert_eq!(reg.regions.len(), 2);
    // The right region's template is clipped by A's right edge.
    assert_eq!(reg.regions[0].template_size, Vec2::new(41, 41));
    assert_eq!(reg.regions[1].template_size, Vec2::new(31, 41));
    assert_eq!(reg.regions[1].search_size, Vec2::new(78, 81));
}

#[test]
fn textureless_sky_regions_are_dismissed() {
    let (width, height) = (240, 200);
    let scene = common::sky_scene(width, height, 90, 230);
    let (a, b) = common::shifted_pair(width, height, -6, 3, scene);
    let b = common::expose(&b, 3, 4, 0);

    let params = Params {
        start_search_size: Vec2::new(61, 61),
        start_correl_size: Vec2::new(21, 21),
        max_regions_per_axis: 5,
        search_shrink_step: 10,
        correl_grow_step: 10,
        ..Params::default()
    };
    let reg = DisplacementFinder::new()
        .with_params(params)
        .find(a.view(), b.view())
        .unwrap();

    assert_eq!(reg.displacement, Vec2::new(-6, 3));
    assert_eq!(reg.passes, 2);
    assert_eq!(reg.regions.len(), 12);
    for region in &reg.regions[..4] {
        assert_eq!(region.status, RegionStatus::Dismissed);
        assert!(region.border_reached);
        assert_eq!(region.rho, 0.0);
    }
    for region in &reg.regions[4..] {
        assert_eq!(region.status, RegionStatus::Finished);
        assert_eq!(region.displacement, Vec2::new(-6, 3));
    }
    assert_eq!(reg.aggregate.used, 8);
}

#[test]
fn exposure_change_does_not_break_registration() {
    let (width, height) = (240, 200);
    let scene = common::sky_scene(width, height, 40, 200);
    let (a, b) = common::shifted_pair(width, height, 5, -4, scene);
    let b = common::expose(&b, 1, 2, 10);

    let reg = DisplacementFinder::new().find(a.view(), b.view()).unwrap();
    assert_eq!(reg.displacement, Vec2::new(5, -4));
    assert_eq!(reg.passes, 2);
}

#[test]
fn degenerate_template_is_rejected() {
    let params = Params {
        start_search_size: Vec2::new(2, 2),
        start_correl_size: Vec2::new(2, 2),
        ..Params::default()
    };
    let finder = DisplacementFinder::new().with_params(params);

    let data = [10u8, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
    let tiny = ImageView::from_slice(&data, 2, 2, 3).unwrap();
    assert_eq!(
        finder.find(tiny, tiny).unwrap_err(),
        HdrAlignError::DegenerateTemplate {
            width: 1,
            height: 1
        }
    );

    let single = ImageView::from_slice(&data[..3], 1, 1, 3).unwrap();
    assert_eq!(
        DisplacementFinder::new().find(single, single).unwrap_err(),
        HdrAlignError::DegenerateTemplate {
            width: 0,
            height: 0
        }
    );
}

#[test]
fn flat_images_have_no_usable_region() {
    let flat = OwnedImage::from_fn(100, 100, 3, |_, _, _| 128u8).unwrap();
    let err = DisplacementFinder::new()
        .with_params(gradient_params())
        .find(flat.view(), flat.view())
        .unwrap_err();
    assert_eq!(err, HdrAlignError::NoUsableRegion { total: 4 });
}

#[test]
fn mismatched_channels_are_rejected() {
    let rgb = vec![0u16; 64 * 64 * 3];
    let rgba = vec![0u16; 64 * 64 * 4];
    let rgb = ImageView::from_slice(&rgb, 64, 64, 3).unwrap();
    let rgba = ImageView::from_slice(&rgba, 64, 64, 4).unwrap();
    assert_eq!(
        DisplacementFinder::new().find(rgb, rgba).unwrap_err(),
        HdrAlignError::ChannelMismatch {
            template: 3,
            window: 4,
        }
    );
}
