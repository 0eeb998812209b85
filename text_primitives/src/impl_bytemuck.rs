// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional `bytemuck` trait impls.

#![allow(
    unsafe_code,
    reason = "The `bytemuck` marker traits are `unsafe` and require `unsafe impl`."
)]

use crate::{CharacterDirection, LineBreakInfo, WordBreakInfo};
use bytemuck::{checked::CheckedBitPattern, Contiguous, NoUninit, Zeroable};

// Safety: The enum is `repr(u8)` and has only fieldless variants.
unsafe impl NoUninit for CharacterDirection {}

// Safety: The enum is `repr(u8)` and `0` is a valid value.
unsafe impl Zeroable for CharacterDirection {}

// Safety: The enum is `repr(u8)`.
unsafe impl CheckedBitPattern for CharacterDirection {
    type Bits = u8;

    fn is_valid_bit_pattern(bits: &u8) -> bool {
        *bits <= Self::RightToLeft as u8
    }
}

// Safety: The enum is `repr(u8)` and its discriminants are contiguous.
unsafe impl Contiguous for CharacterDirection {
    type Int = u8;
    const MIN_VALUE: u8 = Self::LeftToRight as u8;
    const MAX_VALUE: u8 = Self::RightToLeft as u8;
}

// Safety: The enum is `repr(u8)` and has only fieldless variants.
unsafe impl NoUninit for LineBreakInfo {}

// Safety: The enum is `repr(u8)` and `0` is a valid value.
unsafe impl Zeroable for LineBreakInfo {}

// Safety: The enum is `repr(u8)`.
unsafe impl CheckedBitPattern for LineBreakInfo {
    type Bits = u8;

    fn is_valid_bit_pattern(bits: &u8) -> bool {
        *bits <= Self::NoBreak as u8
    }
}

// Safety: The enum is `repr(u8)` and its discriminants are contiguous.
unsafe impl Contiguous for LineBreakInfo {
    type Int = u8;
    const MIN_VALUE: u8 = Self::MustBreak as u8;
    const MAX_VALUE: u8 = Self::NoBreak as u8;
}

// Safety: The enum is `repr(u8)` and has only fieldless variants.
unsafe impl NoUninit for WordBreakInfo {}

// Safety: The enum is `repr(u8)` and `0` is a valid value.
unsafe impl Zeroable for WordBreakInfo {}

// Safety: The enum is `repr(u8)`.
unsafe impl CheckedBitPattern for WordBreakInfo {
    type Bits = u8;

    fn is_valid_bit_pattern(bits: &u8) -> bool {
        *bits <= Self::NoBreak as u8
    }
}
