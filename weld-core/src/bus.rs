//! I2C bus scanner
//!
//! Used at bring-up to find the LCD backpack address.

use embedded_hal_async::i2c::I2c;
use heapless::Vec;

/// Every 7-bit address except the general call address
pub const SCAN_RANGE: core::ops::Range<u8> = 1..128;

/// Probe each address with a one-byte write and collect the ones that ACK
pub async fn scan<I: I2c>(i2c: &mut I) -> Vec<u8, 127> {
    let mut found = Vec::new();
    for address in SCAN_RANGE {
        if i2c.write(address, &[0x00]).await.is_ok() {
            // Capacity equals the size of the range
            let _ = found.push(address);
        }
    }
    found
}
