use super::*;

#[test]
fn kernel_weights_sum_to_one_in_q16() {
    for sigma in [0.5f32, 1.2, 4.0, 7.5] {
        let k = GaussianKernel::new(sigma).unwrap();
        let sum: u32 = k.weights.iter().sum();
        assert_eq!(sum, 65536, "sigma {sigma}");
        assert_eq!(k.weights.len(), 2 * k.radius() + 1);
    }
}

#[test]
fn invalid_sigma_is_rejected() {
    assert!(GaussianKernel::new(0.0).is_err());
    assert!(GaussianKernel::new(f32::NAN).is_err());
}

#[test]
fn constant_image_is_unchanged() {
    let (w, h) = (6u32, 4u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    let out = GaussianKernel::new(2.0).unwrap().apply(&src, w, h).unwrap();
    assert_eq!(out, src);
}

#[test]
fn single_pixel_spreads_and_keeps_energy() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = GaussianKernel::new(1.2).unwrap().apply(&src, w, h).unwrap();
    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: i32 = out.chunks_exact(4).map(|px| i32::from(px[3])).sum();
    assert!((sum_a - 255).abs() <= 6, "sum {sum_a}");
    // symmetric about the center
    let at = |x: u32, y: u32| out[((y * w + x) * 4 + 3) as usize];
    assert_eq!(at(3, 4), at(5, 4));
    assert_eq!(at(4, 3), at(4, 5));
}

#[test]
fn length_mismatch_is_an_error() {
    let k = GaussianKernel::new(1.0).unwrap();
    assert!(k.apply(&[0u8; 12], 2, 2).is_err());
}
