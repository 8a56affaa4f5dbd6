//! Kernel command - prints a kernel matrix and its weight sum.

use crate::KernelArgs;
use anyhow::{bail, Context, Result};
use hwpipe_ops::kernel::{Kernel, DEFAULT_GAUSSIAN_SIZE};
use hwpipe_ops::numeric::to_fixed;

pub fn run(args: KernelArgs) -> Result<()> {
    let fixed3 = |size: Option<usize>, name: &str| -> Result<()> {
        match size {
            Some(s) if s != 3 => bail!("{name} kernel is 3x3 only"),
            _ => Ok(()),
        }
    };

    let kernel = match args.name.to_lowercase().as_str() {
        "gaussian" | "gauss" => {
            Kernel::gaussian(args.size.unwrap_or(DEFAULT_GAUSSIAN_SIZE), args.sigma)?
        }
        "sharpen" => {
            fixed3(args.size, "sharpen")?;
            Kernel::sharpen()
        }
        "sobel_x" => {
            fixed3(args.size, "sobel_x")?;
            Kernel::sobel_x()
        }
        "sobel_y" => {
            fixed3(args.size, "sobel_y")?;
            Kernel::sobel_y()
        }
        "box" => Kernel::box_blur(args.size.unwrap_or(3))?,
        "identity" => Kernel::identity(args.size.unwrap_or(3))?,
        other => bail!("Unknown kernel '{other}'. Available: gaussian, sharpen, sobel_x, sobel_y, box, identity"),
    };

    print!("{kernel}");
    println!("sum = {:.6}", kernel.sum());

    let q8: Vec<String> = kernel.weights().iter().map(|&w| to_fixed(w).to_string()).collect();
    let q8_sum: i32 = kernel.weights().iter().map(|&w| to_fixed(w)).sum();
    let width = q8.iter().map(String::len).max().context("empty kernel")?;
    println!("fixed-point (Q8, sum = {q8_sum}):");
    for row in q8.chunks(kernel.size()) {
        let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
        println!("{}", cells.join(" "));
    }
    Ok(())
}
