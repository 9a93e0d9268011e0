use {
    odo_array::{DType, convert_large_array},
    odo_base::{init_stdout_logger, log_fatal},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger();

    let args: Vec<String> = std::env::args().collect();
    if !(4..=5).contains(&args.len()) {
        let program = args.first().map_or("odo-convert", String::as_str);
        log_fatal!("Usage: {program} <input.npy> <output.npy> <dtype> [factor]");
    }

    let dtype: DType = args[3].parse()?;
    let factor = match args.get(4) {
        Some(value) => value.parse::<f64>()?,
        None => 1.0,
    };
    if !dtype.is_float() && factor.fract() != 0.0 {
        log::warn!("fractional factor {factor} on integer dtype {dtype}: results are truncated");
    }

    convert_large_array(&args[1], &args[2], dtype, factor)?;
    log::info!("done");
    Ok(())
}
