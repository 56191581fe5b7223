//! Bit reversal.
//!
//! The table is filled in O(n) by first seeding the entries `2^k - 1`, whose reversals are the
//! carry patterns `0b1..10..0`, and then deriving every other entry from its predecessor:
//! `A[i + 1] = A[i] ^ A[i ^ (i + 1)]`, since `i ^ (i + 1)` is always one of the seeded patterns.

/// `REVERSE_BITS[b]` is `b` with its bit order reversed.
pub const REVERSE_BITS: [u8; 256] = reverse_table();

const fn reverse_table() -> [u8; 256] {
    let mut table = [0u8; 256];

    // Seed the table.
    let mut i = 0;
    let mut x = 0u8;
    let mut j = 128u8;
    loop {
        table[i] = x;
        if j == 0 {
            break;
        }
        i = 2 * i + 1;
        x += j;
        j /= 2;
    }

    // Fill in the rest of the table.
    let mut i = 1;
    while i < 254 {
        table[i + 1] = table[i] ^ table[i ^ (i + 1)];
        i += 1;
    }

    table
}

/// Reverse the bit order of a byte.
pub const fn reverse_bits(value: u8) -> u8 {
    REVERSE_BITS[value as usize]
}
