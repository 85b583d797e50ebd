use dctsweep_rs::jpeg1::dct::{BLOCK_DIM, fdct_8x8, fdct_8x8_direct, idct_8x8, idct_8x8_direct};
use std::time::Instant;

fn main() {
    println!("Benchmarking DCT implementations...");

    let input: [f64; BLOCK_DIM] =
        std::array::from_fn(|i| ((i * 37) % 256) as f64 - 128.0); // Pseudo-random samples

    let iterations = 100_000;

    // Benchmark direct summation
    let mut coeffs_direct = [0.0f64; BLOCK_DIM];
    let mut output_direct = [0.0f64; BLOCK_DIM];
    let start = Instant::now();
    for _ in 0..iterations {
        fdct_8x8_direct(&input, &mut coeffs_direct);
        idct_8x8_direct(&coeffs_direct, &mut output_direct);
        // prevent optimization
        std::hint::black_box(output_direct);
    }
    let duration_direct = start.elapsed();
    println!("Direct DCT round trip: {:?} for {} iterations", duration_direct, iterations);

    // Benchmark separable
    let mut coeffs_separable = [0.0f64; BLOCK_DIM];
    let mut output_separable = [0.0f64; BLOCK_DIM];
    let start = Instant::now();
    for _ in 0..iterations {
        fdct_8x8(&input, &mut coeffs_separable);
        idct_8x8(&coeffs_separable, &mut output_separable);
        // prevent optimization
        std::hint::black_box(output_separable);
    }
    let duration_separable = start.elapsed();
    println!("Separable DCT round trip: {:?} for {} iterations", duration_separable, iterations);

    // Calc speedup
    let speedup = duration_direct.as_secs_f64() / duration_separable.as_secs_f64();
    println!("Speedup: {:.2}x", speedup);

    // Verify Accuracy
    let mut max_diff = 0.0f64;
    for i in 0..BLOCK_DIM {
        max_diff = max_diff
            .max((coeffs_direct[i] - coeffs_separable[i]).abs())
            .max((input[i] - output_separable[i]).abs());
    }
    println!("Max difference between direct and separable: {:e}", max_diff);

    if max_diff < 1e-9 {
        println!("Accuracy: PASSED (Tolerance < 1e-9)");
    } else {
        println!("Accuracy: FAILED (Tolerance > 1e-9)");
    }
}
