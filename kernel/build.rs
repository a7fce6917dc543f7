use std::{env, error::Error};

/// Build-time knobs for the adaptive swapper, named after the classic
/// `make ALPHA=.. BETA=..` switches.
const KNOBS: [(&str, u32, u32); 2] = [
    // (variable, default, largest accepted value)
    ("SWAP_ALPHA", 25, 1000),
    ("SWAP_BETA", 10, 100),
];

fn main() -> Result<(), Box<dyn Error>> {
    for (name, default, max) in KNOBS {
        println!("cargo:rerun-if-env-changed={name}");

        let value = match env::var(name) {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("{name}={raw:?} is not a percentage: {e}"))?,
            Err(env::VarError::NotPresent) => default,
            Err(e) => return Err(format!("{name}: {e}").into()),
        };
        if value > max {
            return Err(format!("{name}={value} is out of range (0..={max})").into());
        }

        println!("cargo:rustc-env=PAGESWAP_{name}={value}");
    }

    Ok(())
}
