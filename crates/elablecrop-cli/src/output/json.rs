use elablecrop_core::error::CropError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), CropError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
