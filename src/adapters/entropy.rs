//! Seed source for the pattern RNG.
//!
//! On the device this is the hardware RNG (true random once the radio is
//! up).  Host builds mix the wall clock, which is enough for simulation;
//! tests pass fixed seeds directly to the service instead.

#[cfg(target_os = "espidf")]
pub fn seed() -> u32 {
    // SAFETY: esp_random has no preconditions.
    unsafe { esp_idf_svc::sys::esp_random() }
}

#[cfg(not(target_os = "espidf"))]
pub fn seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    (nanos as u32) ^ ((nanos >> 32) as u32)
}
