//! Translation between the console's logical addresses and data file offsets.
//!
//! Logical addresses come from pointer tables inside the cartridge. Two
//! windows are valid:
//!
//! - `$40:0000-$5F:FFFF` maps to itself
//! - `$C0:0000-$FF:FFFF` maps to `address - $C0:0000`
//!
//! The data file starts `$A0200` bytes into a headered image, so that base
//! is subtracted after the optional 512-byte copier header is added.

use crate::RomError;
use std::ops::Range;

/// Size of the copier header in front of the cartridge image.
pub const HEADER_SIZE: usize = 0x200;
/// The data file is assumed to carry the header.
pub const HAS_HEADER: bool = true;

const DATA_BASE: usize = 0xA0200;
const LOWER_BANKS: Range<u32> = 0x40_0000..0x60_0000;
const UPPER_BANKS: Range<u32> = 0xC0_0000..0x100_0000;
const UPPER_BASE: u32 = 0xC0_0000;

fn header_adjust(has_header: bool) -> usize {
    if has_header {
        HEADER_SIZE
    } else {
        0
    }
}

/// Convert a logical address to an offset in the data file.
///
/// Fails with [`RomError::AddressOutOfRange`] for addresses outside both
/// windows, and for addresses that land before the start of the data file.
pub fn to_file_offset(address: u32, has_header: bool) -> Result<usize, RomError> {
    let linear = if LOWER_BANKS.contains(&address) {
        address
    } else if UPPER_BANKS.contains(&address) {
        address - UPPER_BASE
    } else {
        return Err(RomError::AddressOutOfRange(address));
    };

    (linear as usize + header_adjust(has_header))
        .checked_sub(DATA_BASE)
        .ok_or(RomError::AddressOutOfRange(address))
}

/// Inverse of [`to_file_offset`].
pub fn to_logical_address(offset: usize, has_header: bool) -> Result<u32, RomError> {
    let linear = offset
        .checked_add(DATA_BASE)
        .and_then(|a| a.checked_sub(header_adjust(has_header)))
        .and_then(|a| u32::try_from(a).ok())
        .ok_or(RomError::FileOffsetOutOfRange(offset))?;

    if linear < LOWER_BANKS.start {
        Ok(linear + UPPER_BASE)
    } else if LOWER_BANKS.contains(&linear) {
        Ok(linear)
    } else {
        Err(RomError::FileOffsetOutOfRange(offset))
    }
}
