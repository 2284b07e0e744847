use anyhow::{bail, Result};

use pagefx_core::{ColorValidator, CssColorValidator};

pub fn run(values: &[String]) -> Result<()> {
    let mut rejected = 0;

    for value in values {
        if CssColorValidator.is_valid_color(value) {
            println!("  ok       {}", value);
        } else {
            println!("  invalid  {}", value);
            rejected += 1;
        }
    }

    if rejected > 0 {
        bail!("{} of {} values are not valid colors", rejected, values.len());
    }

    Ok(())
}
