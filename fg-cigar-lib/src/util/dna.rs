use lazy_static::lazy_static;

/// IUPAC nucleotide codes paired with their complements.
const IUPAC_PAIRS: [(u8, u8); 16] = [
    (b'A', b'T'),
    (b'C', b'G'),
    (b'G', b'C'),
    (b'T', b'A'),
    (b'U', b'A'),
    (b'M', b'K'),
    (b'K', b'M'),
    (b'R', b'Y'),
    (b'Y', b'R'),
    (b'W', b'W'),
    (b'S', b'S'),
    (b'V', b'B'),
    (b'B', b'V'),
    (b'H', b'D'),
    (b'D', b'H'),
    (b'N', b'N'),
];

lazy_static! {
    /// Complement of every byte value.  Bytes that are not IUPAC codes map to themselves; case is
    /// preserved.
    static ref COMPLEMENT: [u8; 256] = {
        let mut table = [0u8; 256];
        for (byte, slot) in table.iter_mut().enumerate() {
            *slot = byte as u8;
        }
        for (base, comp) in IUPAC_PAIRS {
            table[base as usize] = comp;
            table[base.to_ascii_lowercase() as usize] = comp.to_ascii_lowercase();
        }
        table
    };
}

pub fn complement(base: u8) -> u8 {
    COMPLEMENT[base as usize]
}

/// Returns the reverse complement of the given bases.
pub fn reverse_complement(bases: &[u8]) -> Vec<u8> {
    bases.iter().rev().map(|&b| complement(b)).collect()
}

/// Reverse complements the bases in place.
pub fn reverse_complement_in_place(bases: &mut [u8]) {
    bases.reverse();
    bases.iter_mut().for_each(|b| *b = complement(*b));
}
